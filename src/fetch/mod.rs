//! Request construction and the transport adapter.
//!
//! This module provides:
//! - `RequestBatch`: the URIs and shared settings of one run
//! - `build_requests`: turns a batch into request descriptors (GET only)
//! - `Transport`: the capability that performs one HTTP call
//! - `ReqwestTransport`: the production `Transport` built on `reqwest`

mod request;
#[cfg(test)]
pub(crate) mod test_helpers;
mod transport;

// Re-export public API
pub use request::{build_requests, RequestBatch, RequestDescriptor, Timeouts};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportResponse};
