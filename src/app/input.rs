//! Reading URI batches from files or stdin.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::url::validate_and_normalize_url;

/// Reads a URI batch from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a line cannot be read.
pub fn read_uris(path: &Path) -> Result<Vec<String>> {
    let uris = if path.as_os_str() == "-" {
        info!("Reading URIs from stdin");
        parse_uris(io::stdin().lock())?
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        parse_uris(BufReader::new(file))?
    };
    info!("Total URIs in batch: {}", uris.len());
    Ok(uris)
}

/// One URI per line; blank lines and `#` comments are skipped, invalid URIs are
/// warned about and skipped.
pub fn parse_uris<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut uris = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read line from input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(uri) = validate_and_normalize_url(trimmed) {
            uris.push(uri);
        }
    }
    Ok(uris)
}
