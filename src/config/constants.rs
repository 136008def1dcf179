//! Configuration constants.
//!
//! Timeouts, status code sentinels and other operational defaults used throughout
//! the aggregator.

use std::time::Duration;

/// TCP connect timeout applied to every request unless overridden.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total per-request timeout (connect + headers + body) unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(200);

/// Default User-Agent string for HTTP requests.
pub const DEFAULT_USER_AGENT: &str = concat!("http-request-aggregator/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirect hops the shared client follows.
pub const MAX_REDIRECT_HOPS: usize = 10;

// HTTP status codes (for clarity and consistency)
/// The only status whose body is kept and aggregated.
pub const HTTP_STATUS_OK: u16 = 200;

/// Sentinel status recorded when a request produced no HTTP response at all
/// (timeout, refused connection, invalid URL, ...).
pub const TRANSPORT_FAILURE_STATUS: u16 = 599;

/// Maximum URL length accepted from input files.
pub const MAX_URL_LENGTH: usize = 2048;
