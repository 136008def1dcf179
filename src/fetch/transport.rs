//! The transport seam: one asynchronous HTTP call per request descriptor.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{HttpMethod, HTTP_STATUS_OK};
use crate::error_handling::{categorize_reqwest_error, TransportFailureKind};

use super::request::RequestDescriptor;

/// What a transport returns for a request that produced an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Final URL after redirects
    pub effective_url: String,
    /// Response body. Transports may leave this empty for non-200 statuses.
    pub body: Vec<u8>,
}

/// A request that produced no HTTP status at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} for {url}: {message}")]
pub struct TransportError {
    /// Failure category
    pub kind: TransportFailureKind,
    /// The requested URL (there is no effective URL without a response)
    pub url: String,
    /// Underlying error message
    pub message: String,
}

/// Performs HTTP calls on behalf of the dispatcher.
///
/// Implementations must be cheap to share: the dispatcher holds one `Arc` and
/// issues every request of a batch through it concurrently.
pub trait Transport: Send + Sync + 'static {
    /// Issues one request and waits for its status and, for 200, its body.
    ///
    /// Any HTTP status, error statuses included, is an `Ok`. `Err` means no
    /// status was received.
    fn fetch(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }
}

/// `reqwest`-backed transport.
///
/// The connect timeout is a property of the shared client (see
/// `initialization::init_client`); the total timeout and credentials are applied
/// per request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Arc<reqwest::Client>,
}

impl ReqwestTransport {
    /// Wraps a shared client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }

    fn failure(request: &RequestDescriptor, error: &reqwest::Error) -> TransportError {
        TransportError {
            kind: categorize_reqwest_error(error),
            url: request.url.clone(),
            message: error.to_string(),
        }
    }
}

impl Transport for ReqwestTransport {
    async fn fetch(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str())
            .timeout(request.timeouts.request);
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(&credentials.username, credentials.password.as_ref());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::failure(request, &e))?;

        let status = response.status().as_u16();
        let effective_url = response.url().to_string();

        // Only 200 bodies are aggregated; everything else is dropped unread
        let body = if status == HTTP_STATUS_OK {
            response
                .bytes()
                .await
                .map_err(|e| Self::failure(request, &e))?
                .to_vec()
        } else {
            Vec::new()
        };

        Ok(TransportResponse {
            status,
            effective_url,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fetch::request::Timeouts;
    use crate::initialization::init_client;

    fn descriptor(url: &str) -> RequestDescriptor {
        let config = Config::default();
        RequestDescriptor {
            url: url.to_string(),
            method: HttpMethod::Get,
            credentials: None,
            timeouts: Timeouts::from(&config),
        }
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(HttpMethod::Head), reqwest::Method::HEAD);
        assert_eq!(reqwest::Method::from(HttpMethod::Patch), reqwest::Method::PATCH);
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_transport_failure() {
        let client = init_client(&Config::default()).expect("client should build");
        let transport = ReqwestTransport::new(client);

        let err = transport
            .fetch(&descriptor("definitely not a url"))
            .await
            .expect_err("invalid URL cannot produce a response");

        assert_eq!(err.kind, TransportFailureKind::InvalidUrl);
        assert_eq!(err.url, "definitely not a url");
        assert!(err.to_string().contains("Invalid URL"));
    }
}
