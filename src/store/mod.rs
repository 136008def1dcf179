//! Per-run response store.
//!
//! Buckets completed requests by exact status code, in arrival order within each
//! bucket. Iteration order over codes is unspecified; consumers that need a stable
//! order sort explicitly.

mod record;

use std::collections::HashMap;

use log::debug;

use crate::config::{HTTP_STATUS_OK, TRANSPORT_FAILURE_STATUS};
use crate::fetch::{TransportError, TransportResponse};

pub use record::ResponseRecord;

/// Mapping from status code to the records received with that code.
#[derive(Debug, Default, Clone)]
pub struct ResponseStore {
    buckets: HashMap<u16, Vec<ResponseRecord>>,
    total: usize,
}

impl ResponseStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the bucket for `status`.
    pub fn record(&mut self, status: u16, record: ResponseRecord) {
        self.buckets.entry(status).or_default().push(record);
        self.total += 1;
    }

    /// Classifies one completion and stores it. Returns the status it was filed under.
    ///
    /// - 200: the full response is kept
    /// - any other status: only the effective URL is kept
    /// - transport failure: the requested URL is filed under `TRANSPORT_FAILURE_STATUS`
    pub fn record_completion(
        &mut self,
        outcome: Result<TransportResponse, TransportError>,
    ) -> u16 {
        match outcome {
            Ok(TransportResponse {
                status,
                effective_url,
                body,
            }) => {
                debug!("{} -> {}", effective_url, status);
                let record = if status == HTTP_STATUS_OK {
                    ResponseRecord::Success {
                        effective_url,
                        body,
                    }
                } else {
                    ResponseRecord::Failure { url: effective_url }
                };
                self.record(status, record);
                status
            }
            Err(error) => {
                debug!("{}", error);
                self.record(
                    TRANSPORT_FAILURE_STATUS,
                    ResponseRecord::Failure { url: error.url },
                );
                TRANSPORT_FAILURE_STATUS
            }
        }
    }

    /// Records for one status code, in arrival order.
    pub fn get(&self, status: u16) -> Option<&[ResponseRecord]> {
        self.buckets.get(&status).map(Vec::as_slice)
    }

    /// The 200 bucket (empty when nothing succeeded).
    pub fn successes(&self) -> &[ResponseRecord] {
        self.get(HTTP_STATUS_OK).unwrap_or(&[])
    }

    /// All buckets, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &[ResponseRecord])> {
        self.buckets
            .iter()
            .map(|(status, records)| (*status, records.as_slice()))
    }

    /// Number of records stored across all buckets.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
