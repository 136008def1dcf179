//! Shared test helpers for run and aggregator tests.
//!
//! `ScriptedTransport` answers each URL from a fixed script, optionally after a
//! delay, so completion order can be controlled without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::error_handling::TransportFailureKind;

use super::{RequestDescriptor, Transport, TransportError, TransportResponse};

#[derive(Debug, Clone)]
enum Scripted {
    Respond { status: u16, body: Vec<u8> },
    Fail(TransportFailureKind),
    Panic,
}

/// In-memory `Transport` driven by a per-URL script.
///
/// Unscripted URLs answer 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: HashMap<String, (Scripted, Duration)>,
    calls: AtomicUsize,
    seen: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `url` with `status` and `body`.
    pub fn respond(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.script.insert(
            url.to_string(),
            (
                Scripted::Respond {
                    status,
                    body: body.into(),
                },
                Duration::ZERO,
            ),
        );
        self
    }

    /// Answers `url` after `delay`.
    pub fn respond_after(
        mut self,
        url: &str,
        delay: Duration,
        status: u16,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        self.script.insert(
            url.to_string(),
            (
                Scripted::Respond {
                    status,
                    body: body.into(),
                },
                delay,
            ),
        );
        self
    }

    /// Fails `url` with a transport error.
    pub fn fail(mut self, url: &str, kind: TransportFailureKind) -> Self {
        self.script
            .insert(url.to_string(), (Scripted::Fail(kind), Duration::ZERO));
        self
    }

    /// Panics inside `fetch` for `url`.
    pub fn panic_on(mut self, url: &str) -> Self {
        self.script
            .insert(url.to_string(), (Scripted::Panic, Duration::ZERO));
        self
    }

    /// Number of fetches issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every descriptor received so far, in submission order.
    pub fn seen(&self) -> Vec<RequestDescriptor> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

impl Transport for ScriptedTransport {
    async fn fetch(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }

        let (scripted, delay) = self
            .script
            .get(&request.url)
            .cloned()
            .unwrap_or((
                Scripted::Respond {
                    status: 404,
                    body: Vec::new(),
                },
                Duration::ZERO,
            ));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match scripted {
            Scripted::Respond { status, body } => Ok(TransportResponse {
                status,
                effective_url: request.url.clone(),
                body: if status == 200 { body } else { Vec::new() },
            }),
            Scripted::Fail(kind) => Err(TransportError {
                kind,
                url: request.url.clone(),
                message: format!("scripted {kind}"),
            }),
            Scripted::Panic => panic!("scripted panic for {}", request.url),
        }
    }
}
