//! Error handling and failure statistics.
//!
//! This module provides:
//! - Typed errors for configuration, aggregation and initialization failures
//! - Transport failure categorization from `reqwest` errors
//! - Per-run transport failure statistics
//!
//! Only configuration and aggregation problems are raised to callers. Non-2xx
//! statuses and transport failures are expected outcomes of a fan-out and are
//! recorded in the response store instead.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::FailureStats;
pub use types::{AggregatorError, ConfigurationError, InitializationError, TransportFailureKind};
