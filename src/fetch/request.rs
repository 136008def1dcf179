//! Request batches and request descriptors.

use std::time::Duration;

use crate::config::{Config, Credentials, HttpMethod};
use crate::error_handling::{AggregatorError, ConfigurationError};

/// The URIs of one run plus the settings shared by all of their requests.
///
/// A batch is an immutable snapshot for the duration of a run; `reset_batch`
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBatch {
    uris: Vec<String>,
    method: HttpMethod,
    credentials: Option<Credentials>,
}

impl RequestBatch {
    /// Creates a batch of `uris` sharing one method and optional credentials.
    pub fn new(uris: Vec<String>, method: HttpMethod, credentials: Option<Credentials>) -> Self {
        Self {
            uris,
            method,
            credentials,
        }
    }

    /// Returns the same settings with a different URI list.
    pub fn with_uris(&self, uris: Vec<String>) -> Self {
        Self {
            uris,
            method: self.method,
            credentials: self.credentials.clone(),
        }
    }

    /// URIs in dispatch order, duplicates included.
    pub fn uris(&self) -> &[String] {
        &self.uris
    }

    /// Method shared by every request.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Credentials shared by every request.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Number of URIs.
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Whether the batch has no URIs.
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

impl From<&Config> for RequestBatch {
    fn from(config: &Config) -> Self {
        Self::new(
            config.uris.clone(),
            config.method,
            config.credentials.clone(),
        )
    }
}

/// Connect and total timeouts applied to each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// TCP connect timeout
    pub connect: Duration,
    /// Total timeout, body read included
    pub request: Duration,
}

impl From<&Config> for Timeouts {
    fn from(config: &Config) -> Self {
        Self {
            connect: config.connect_timeout,
            request: config.request_timeout,
        }
    }
}

/// Everything a transport needs to issue one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Request URL, trimmed of surrounding whitespace
    pub url: String,
    /// Always `Get` once built
    pub method: HttpMethod,
    /// Basic-auth credentials, if any
    pub credentials: Option<Credentials>,
    /// Connect and total timeouts
    pub timeouts: Timeouts,
}

/// Builds one request descriptor per URI of the batch.
///
/// Fails before producing anything if the batch's method cannot be dispatched.
///
/// # Errors
///
/// Returns `AggregatorError::Configuration` for any method other than GET.
pub fn build_requests(
    batch: &RequestBatch,
    timeouts: Timeouts,
) -> Result<Vec<RequestDescriptor>, AggregatorError> {
    if !batch.method().is_supported() {
        return Err(ConfigurationError::UnsupportedMethod(batch.method()).into());
    }

    Ok(batch
        .uris()
        .iter()
        .map(|uri| RequestDescriptor {
            url: uri.trim().to_string(),
            method: batch.method(),
            credentials: batch.credentials().cloned(),
            timeouts,
        })
        .collect())
}
