//! Error type definitions.
//!
//! This module defines the error types surfaced to callers and the categories used
//! to classify transport failures.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::HttpMethod;

/// Errors raised by batch dispatch and aggregation.
///
/// Non-2xx responses and transport failures are never reported through this type:
/// they are expected outcomes of a fan-out and are recorded in the response store.
#[derive(Error, Debug)]
pub enum AggregatorError {
    /// The batch cannot be dispatched as configured.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A successful response body is not valid UTF-8.
    #[error("Response body from {url} is not valid UTF-8: {source}")]
    Decode {
        /// Effective URL of the offending response
        url: String,
        /// Underlying decoding failure
        #[source]
        source: std::str::Utf8Error,
    },

    /// The 200 bucket is empty at aggregation time.
    #[error("No successful responses to aggregate")]
    NoSuccessfulResponses,

    /// The aggregated bodies do not form a valid JSON array.
    #[error("Aggregated responses are not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Configuration problems detected before any request is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Only GET requests can be dispatched.
    #[error("Unsupported HTTP method {0}: only GET requests can be dispatched")]
    UnsupportedMethod(HttpMethod),
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error building the async runtime that drives the requests.
    #[error("Runtime initialization error: {0}")]
    RuntimeError(#[from] std::io::Error),
}

/// Categories of transport failures (requests that produced no HTTP status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum TransportFailureKind {
    /// The request could not be built (usually an invalid URL)
    InvalidUrl,
    /// Redirect policy violated (loop or too many hops)
    Redirect,
    /// Connect or total timeout elapsed
    Timeout,
    /// TCP/TLS connection could not be established
    Connect,
    /// Error while sending the request
    Request,
    /// Error while reading the response body
    Body,
    /// Error while decoding the response body (e.g. compression)
    Decode,
    /// Anything else
    Other,
}

impl std::fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransportFailureKind {
    /// Returns a human-readable string representation of the failure kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportFailureKind::InvalidUrl => "Invalid URL",
            TransportFailureKind::Redirect => "Redirect error",
            TransportFailureKind::Timeout => "Timeout",
            TransportFailureKind::Connect => "Connection error",
            TransportFailureKind::Request => "Request error",
            TransportFailureKind::Body => "Body read error",
            TransportFailureKind::Decode => "Body decode error",
            TransportFailureKind::Other => "Other transport error",
        }
    }
}
