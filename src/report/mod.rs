//! Human-readable reporting over a response store.
//!
//! Reporting never fails: it is available whatever happened to aggregation.

use log::{info, warn};

use crate::store::{ResponseRecord, ResponseStore};

/// One line per status code present, `"<code>: <count>"`, in store iteration order.
pub fn summary(store: &ResponseStore) -> String {
    store
        .iter()
        .map(|(status, records)| format!("{}: {}\n", status, records.len()))
        .collect()
}

/// Every code whose decimal form does not start with `2`, ascending, with its records.
pub fn failed_requests(store: &ResponseStore) -> Vec<(u16, &[ResponseRecord])> {
    let mut failed: Vec<(u16, &[ResponseRecord])> = store
        .iter()
        .filter(|(status, _)| !status.to_string().starts_with('2'))
        .collect();
    failed.sort_by_key(|(status, _)| *status);
    failed
}

/// Logs the per-code counts (sorted) and every failed URL.
pub fn log_report(store: &ResponseStore) {
    let mut counts: Vec<(u16, usize)> = store
        .iter()
        .map(|(status, records)| (status, records.len()))
        .collect();
    counts.sort_unstable();
    info!("Response Counts ({} total):", store.total());
    for (status, count) in counts {
        info!("   {}: {}", status, count);
    }

    for (status, records) in failed_requests(store) {
        for record in records {
            warn!("{} {}", status, record);
        }
    }
}
