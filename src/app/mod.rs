//! Command-line support.
//!
//! URI input reading and validation used by the binary. The aggregator itself
//! takes URIs as given.

pub mod input;
pub mod url;

// Re-export public API
pub use self::input::{parse_uris, read_uris};
pub use self::url::validate_and_normalize_url;
