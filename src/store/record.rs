//! Response record types.

use std::fmt;

/// One completed request as kept by the response store.
///
/// Only 200 responses keep their body; every other outcome keeps the URL alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseRecord {
    /// A 200 response.
    Success {
        /// Final URL after redirects
        effective_url: String,
        /// Raw body bytes
        body: Vec<u8>,
    },
    /// Any other status, or a transport failure.
    Failure {
        /// Effective URL, or the requested URL when no response arrived
        url: String,
    },
}

impl ResponseRecord {
    /// The URL this record was received from.
    pub fn url(&self) -> &str {
        match self {
            ResponseRecord::Success { effective_url, .. } => effective_url,
            ResponseRecord::Failure { url } => url,
        }
    }

    /// The body bytes, for successful responses.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            ResponseRecord::Success { body, .. } => Some(body),
            ResponseRecord::Failure { .. } => None,
        }
    }

    /// Whether this is a 200 record.
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseRecord::Success { .. })
    }
}

impl fmt::Display for ResponseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}
