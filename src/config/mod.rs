//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, user agent, sentinel status codes)
//! - The library `Config` and the enums shared with the CLI

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, Credentials, HttpMethod, LogFormat, LogLevel};
