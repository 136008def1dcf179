//! Per-request task.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;

use crate::error_handling::TransportFailureKind;
use crate::fetch::{RequestDescriptor, Transport, TransportError, TransportResponse};

/// What a request task reports back to the collector.
pub(crate) type Completion = Result<TransportResponse, TransportError>;

/// The one completion a request task owes the collector.
///
/// Dropped unfilled (the task panicked or was dropped before finishing), it reports
/// a transport failure for its URL instead, so every dispatched request is counted.
pub(crate) struct CompletionSlot {
    url: String,
    sender: Option<UnboundedSender<Completion>>,
}

impl CompletionSlot {
    pub(crate) fn new(url: String, sender: UnboundedSender<Completion>) -> Self {
        Self {
            url,
            sender: Some(sender),
        }
    }

    fn fill(mut self, completion: Completion) {
        if let Some(sender) = self.sender.take() {
            if sender.send(completion).is_err() {
                debug!("Collector is gone; dropping completion for {}", self.url);
            }
        }
    }
}

impl Drop for CompletionSlot {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            warn!("Request task for {} ended without a response", self.url);
            let _ = sender.send(Err(TransportError {
                kind: TransportFailureKind::Other,
                url: self.url.clone(),
                message: "request task ended without a response".to_string(),
            }));
        }
    }
}

/// Fetches one request and fills its completion slot.
///
/// This function is spawned as a Tokio task for each request. It never retries:
/// whatever the transport returns (response or failure) is the completion.
pub(crate) async fn fetch_one<T: Transport>(
    transport: Arc<T>,
    request: RequestDescriptor,
    slot: CompletionSlot,
) {
    let outcome = transport.fetch(&request).await;
    slot.fill(outcome);
}
