//! HTTP client initialization.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS};

/// Initializes the shared HTTP client for a batch.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config
/// - Connect timeout from the config (applies to every request of the client)
/// - Redirect following (up to `MAX_REDIRECT_HOPS`), so the effective URL is the final one
///
/// The total request timeout is not set here: it is applied per request from the
/// request descriptor.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
