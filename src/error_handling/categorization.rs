//! Transport error categorization.

use super::types::TransportFailureKind;

/// Categorizes a `reqwest::Error` into a `TransportFailureKind`.
///
/// Only called for errors that carry no HTTP status: status-bearing responses are
/// recorded under their own code and never reach this function.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> TransportFailureKind {
    if error.is_builder() {
        TransportFailureKind::InvalidUrl
    } else if error.is_redirect() {
        TransportFailureKind::Redirect
    } else if error.is_timeout() {
        TransportFailureKind::Timeout
    } else if error.is_connect() {
        TransportFailureKind::Connect
    } else if error.is_request() {
        TransportFailureKind::Request
    } else if error.is_body() {
        TransportFailureKind::Body
    } else if error.is_decode() {
        TransportFailureKind::Decode
    } else {
        TransportFailureKind::Other
    }
}
