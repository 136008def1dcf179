//! Resource setup.
//!
//! This module provides functions to initialize the shared resources of an
//! aggregator:
//! - Logger (used by the binary)
//! - HTTP client
//! - The executor that drives a batch

mod client;
mod logger;

use tokio::runtime::{Builder, Runtime};

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes the executor owned by an aggregator.
///
/// A current-thread runtime: every request is submitted without blocking and all
/// completions are handled on the thread that called `run_batch`.
///
/// # Errors
///
/// Returns an `std::io::Error` if the runtime's I/O or timer drivers cannot be created.
pub fn init_runtime() -> Result<Runtime, std::io::Error> {
    Builder::new_current_thread().enable_all().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_runtime_drives_futures() {
        let runtime = init_runtime().expect("runtime should build");
        let value = runtime.block_on(async {
            let handle = tokio::spawn(async { 21 * 2 });
            handle.await.expect("task should not panic")
        });
        assert_eq!(value, 42);
    }
}
