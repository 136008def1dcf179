//! Transport failure statistics.
//!
//! Counts transport failures per category for one run so they can be logged once
//! the run completes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::TransportFailureKind;

/// Thread-safe transport failure tracker.
///
/// All categories are initialized to zero on creation, so lookups never miss.
#[derive(Debug)]
pub struct FailureStats {
    failures: HashMap<TransportFailureKind, AtomicUsize>,
}

impl Default for FailureStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureStats {
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in TransportFailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }
        FailureStats { failures }
    }

    /// Increment the counter for a failure category.
    pub fn increment(&self, kind: TransportFailureKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map. \
                 This indicates a bug in FailureStats initialization.",
                kind
            );
        }
    }

    /// Get the count for a failure category.
    pub fn get_count(&self, kind: TransportFailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total number of transport failures recorded.
    pub fn total(&self) -> usize {
        self.failures.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    /// Logs the non-zero categories at info level.
    pub fn log_summary(&self) {
        let total = self.total();
        if total == 0 {
            return;
        }
        log::info!("Transport failures ({} total):", total);
        for kind in TransportFailureKind::iter() {
            let count = self.get_count(kind);
            if count > 0 {
                log::info!("   {}: {}", kind.as_str(), count);
            }
        }
    }
}
