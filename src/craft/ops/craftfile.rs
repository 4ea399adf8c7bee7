//! Compiling and loading craftfiles (spec.md §6): a craftfile is a small
//! Rust crate, built as a `cdylib` against the exact `craft` the host is
//! running, exporting `extern "C" fn craft_entry(*mut DefinitionContext)`.
//!
//! The original embeds a scripting VM directly in-process; spec.md §6
//! explicitly allows substituting another embeddable definition mechanism
//! as long as craftfiles still get a live `DefinitionContext` to populate.
//! A `cdylib` loaded with `libloading` is that mechanism here: no bit-exact
//! compatibility with the original's embedding is implied or required.

use std::path::{Path, PathBuf};

use anyhow::Context;
use craft_log::{Kernel, Level};
use craft_platform::Platform;
use libloading::Symbol;
use regex::Regex;

use crate::core::definition_context::DefinitionContext;
use crate::core::error::{CraftError, CraftResult};

/// The signature every craftfile's exported entry point must have.
type CraftEntry = unsafe extern "C" fn(*mut DefinitionContext);

/// Build `craftfile_dir`'s Cargo package in release mode and return the
/// path to the `cdylib` it produced.
pub fn compile(craftfile_dir: &Path, kernel: &Kernel) -> CraftResult<PathBuf> {
    let manifest = craftfile_dir.join("Cargo.toml");
    if !manifest.exists() {
        return Err(CraftError::CraftfileNotFound(craftfile_dir.to_path_buf()).into());
    }

    let args = vec![
        "build".to_string(),
        "--release".to_string(),
        "--manifest-path".to_string(),
        manifest.to_string_lossy().into_owned(),
    ];

    let mut out = String::new();
    let mut err = String::new();
    let outcome = craft_platform::process::run(craftfile_dir, "cargo", &args, |s| out.push_str(s), |s| err.push_str(s), 0)
        .context("failed to launch cargo to build the craftfile")?;
    kernel.log_lines("craftfile", Level::Verbose, &out);
    kernel.log_lines("craftfile", Level::Verbose, &err);
    if outcome.status != 0 {
        anyhow::bail!("craftfile at `{}` failed to compile", craftfile_dir.display());
    }

    let crate_name = package_name(&manifest)?;
    let file_name = Platform::host().dynamic_library_file_name(&crate_name.replace('-', "_"));
    Ok(craftfile_dir.join("target/release").join(file_name))
}

/// Load the `cdylib` at `library_path` and call its `craft_entry` with
/// `ctx`.
///
/// # Safety
/// The caller is trusted to only pass a library craft itself just built
/// from a craftfile crate; see [`craft_platform::dylib::open`].
pub unsafe fn run(library_path: &Path, ctx: &mut DefinitionContext) -> CraftResult<()> {
    let library = craft_platform::dylib::open(library_path)?;
    let entry: Symbol<'_, CraftEntry> = craft_platform::dylib::symbol(&library, "craft_entry")?;
    entry(ctx as *mut DefinitionContext);
    Ok(())
}

/// Compile and immediately run a craftfile against `ctx`.
pub fn load(craftfile_dir: &Path, ctx: &mut DefinitionContext, kernel: &Kernel) -> CraftResult<()> {
    let library_path = compile(craftfile_dir, kernel)?;
    unsafe { run(&library_path, ctx) }
}

fn package_name(manifest: &Path) -> CraftResult<String> {
    let contents = std::fs::read_to_string(manifest)
        .with_context(|| format!("failed to read `{}`", manifest.display()))?;
    let re = Regex::new(r#"(?m)^\s*name\s*=\s*"([^"]+)""#).expect("static regex is valid");
    let caps = re
        .captures(&contents)
        .with_context(|| format!("`{}` has no [package] name", manifest.display()))?;
    Ok(caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_package_name() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("Cargo.toml");
        std::fs::write(&manifest, "[package]\nname = \"my-craftfile\"\nversion = \"0.1.0\"\n").unwrap();
        assert_eq!(package_name(&manifest).unwrap(), "my-craftfile");
    }

    #[test]
    fn missing_manifest_is_a_craftfile_not_found_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = compile(dir.path(), &Kernel::console_only()).unwrap_err();
        assert!(err.downcast_ref::<CraftError>().is_some());
    }
}
