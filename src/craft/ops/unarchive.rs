//! Zip extraction for `unarchive` targets (spec.md §4.7), grounded on the
//! original tool's libzip-based extractor.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::Context;
use craft_log::{Kernel, Level};

use crate::core::error::CraftResult;

/// Extract every entry of the zip archive at `archive_path` under `dest_dir`,
/// creating intermediate directories as needed and restoring Unix
/// executable bits from the archive's external attributes where present.
pub fn unarchive(archive_path: &Path, dest_dir: &Path, kernel: &Kernel) -> CraftResult<()> {
    let _span = kernel.span("unarchive");
    kernel.log("unarchive", Level::Info, format!("extracting {}", archive_path.display()));

    let file = File::open(archive_path).with_context(|| format!("failed to open `{}`", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("`{}` is not a valid zip archive", archive_path.display()))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let out_path = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out_file = File::create(&out_path)
            .with_context(|| format!("failed to create `{}`", out_path.display()))?;
        io::copy(&mut entry, &mut out_file)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))?;
        }
    }

    Ok(())
}
