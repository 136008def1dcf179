//! http_request_aggregator library: concurrent fetch and JSON aggregation
//!
//! This library fans a batch of URIs out as concurrent HTTP GET requests, waits for
//! every response, buckets the results by status code, and merges the bodies of
//! the 200 responses into a single JSON array.
//!
//! # Example
//!
//! ```no_run
//! use http_request_aggregator::{Config, HttpRequestAggregator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut aggregator = HttpRequestAggregator::new(Config {
//!     uris: vec![
//!         "https://api.example.com/items/1".to_string(),
//!         "https://api.example.com/items/2".to_string(),
//!     ],
//!     ..Default::default()
//! })?;
//!
//! let report = aggregator.run_batch()?;
//! println!("{} of {} requests succeeded", report.successful, report.total_requests);
//!
//! for (status, records) in aggregator.failed_requests() {
//!     println!("{status}: {} failed", records.len());
//! }
//! println!("{}", aggregator.aggregated_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! # Execution model
//!
//! `HttpRequestAggregator` owns a current-thread Tokio runtime and blocks in
//! `run_batch`. Async callers should use `run::execute_run` directly instead.

#![warn(missing_docs)]

mod aggregate;
mod aggregator;
pub mod app;
pub mod config;
mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod report;
pub mod run;
mod store;

// Re-export public API
pub use aggregate::ReturnData;
pub use aggregator::HttpRequestAggregator;
pub use config::{Config, Credentials, HttpMethod, LogFormat, LogLevel};
pub use error_handling::{
    AggregatorError, ConfigurationError, InitializationError, TransportFailureKind,
};
pub use fetch::{ReqwestTransport, RequestBatch, Transport, TransportError, TransportResponse};
pub use run::{RunReport, TrackerState};
pub use store::{ResponseRecord, ResponseStore};
