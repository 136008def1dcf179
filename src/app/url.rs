//! URI validation and normalization for input lines.

use log::warn;

use crate::config::MAX_URL_LENGTH;

/// Validates and normalizes one URI read from input.
///
/// Adds an `https://` prefix when no scheme is given, rejects other schemes, and
/// rejects anything longer than `MAX_URL_LENGTH` or not parseable as a URL.
/// Logs a warning and returns `None` for rejected input.
pub fn validate_and_normalize_url(uri: &str) -> Option<String> {
    let normalized = if uri.contains("://") {
        uri.to_string()
    } else {
        format!("https://{uri}")
    };

    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URI exceeding maximum length ({} > {}): {}...",
            normalized.len(),
            MAX_URL_LENGTH,
            uri.chars().take(50).collect::<String>()
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Some(normalized)
        }
        Ok(parsed) => {
            warn!("Skipping URI with unsupported scheme {}: {uri}", parsed.scheme());
            None
        }
        Err(e) => {
            warn!("Skipping invalid URI {uri}: {e}");
            None
        }
    }
}
