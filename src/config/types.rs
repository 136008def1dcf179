//! Configuration types.
//!
//! This module defines the library `Config` together with the enums shared by the
//! library and the command-line wrapper.

use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use strum_macros::{Display, EnumIter, EnumString};

use crate::config::constants::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// HTTP method shared by every request of a batch.
///
/// Only `Get` can be dispatched; the other variants exist so that a caller asking
/// for them gets a configuration error instead of a silent no-op.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
}

impl HttpMethod {
    /// Whether requests with this method can actually be dispatched.
    pub fn is_supported(self) -> bool {
        self == HttpMethod::Get
    }
}

/// Basic-auth credentials sent with every request of a batch.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Basic-auth user name
    pub username: String,
    /// Optional basic-auth password
    pub password: Option<String>,
}

impl Credentials {
    /// Creates credentials from a user name and optional password.
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use http_request_aggregator::{Config, Credentials};
///
/// let config = Config {
///     uris: vec!["https://api.example.com/items/1".to_string()],
///     credentials: Some(Credentials::new("reader", Some("secret".to_string()))),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// URIs fetched by the first run
    pub uris: Vec<String>,

    /// Optional basic-auth credentials
    pub credentials: Option<Credentials>,

    /// HTTP method (only GET is functional)
    pub method: HttpMethod,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Total per-request timeout
    pub request_timeout: Duration,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uris: Vec::new(),
            credentials: None,
            method: HttpMethod::Get,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
