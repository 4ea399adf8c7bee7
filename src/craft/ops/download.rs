//! HTTP downloads for `download` targets (spec.md §4.6), grounded on the
//! original tool's libcurl-based fetcher.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use craft_log::{Kernel, Level};

use crate::core::error::CraftResult;

/// Fetch `url` into `destination`, following redirects. Parent directories
/// must already exist.
pub fn download(url: &str, destination: &Path, kernel: &Kernel) -> CraftResult<()> {
    let _span = kernel.span("download");
    kernel.log("download", Level::Info, format!("fetching {url}"));

    let mut handle = curl::easy::Easy::new();
    handle.url(url).with_context(|| format!("invalid URL `{url}`"))?;
    handle.follow_location(true)?;
    handle.fail_on_error(true)?;

    let mut file = File::create(destination)
        .with_context(|| format!("failed to create `{}`", destination.display()))?;

    {
        let mut transfer = handle.transfer();
        transfer.write_function(|data| {
            file.write_all(data).map(|_| data.len()).or(Ok(0))
        })?;
        transfer.perform().with_context(|| format!("failed to download `{url}`"))?;
    }

    Ok(())
}
