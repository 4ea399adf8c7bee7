//! Loading and invoking the dynamic library a compiled craftfile produces.
//!
//! This is deliberately thin: the contract (spec.md §6) is "compile the
//! craftfile, load it, call one exported entry point" — the ABI craft uses
//! for that entry point is decided by the crate that embeds this one
//! (`src/craft/ops/craftfile.rs`), since it needs types this lower-level
//! crate doesn't know about.

use std::path::Path;

use anyhow::{Context, Result};
use libloading::{Library, Symbol};

/// Open a dynamic library at `path`.
///
/// # Safety
/// Loading and running code from an arbitrary dynamic library is inherently
/// unsafe: the library's initializers run immediately, and nothing stops it
/// from being malformed or incompatible with the host. Callers are trusted
/// to only load craftfiles craft itself just compiled.
pub unsafe fn open(path: &Path) -> Result<Library> {
    Library::new(path).with_context(|| format!("failed to load craftfile library `{}`", path.display()))
}

/// Look up `symbol` in `lib` with caller-chosen signature `T`.
///
/// # Safety
/// The caller must ensure `T` exactly matches the real signature of the
/// exported symbol; a mismatch is undefined behavior.
pub unsafe fn symbol<'lib, T>(lib: &'lib Library, symbol: &str) -> Result<Symbol<'lib, T>> {
    let mut name = symbol.as_bytes().to_vec();
    name.push(0);
    lib.get(&name)
        .with_context(|| format!("craftfile library does not export `{symbol}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_an_error() {
        let result = unsafe { open(Path::new("/nonexistent/libcraftfile_test.so")) };
        assert!(result.is_err());
    }
}
