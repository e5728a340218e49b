//! Outcome of an HTTP fetch as seen by the page controllers.

use thiserror::Error;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// Status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpReply {
    /// Create a reply.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body of a successful reply, or [`FetchError::Status`].
    pub fn into_text(self) -> Result<String, FetchError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(FetchError::Status(self.status))
        }
    }
}

/// Why a fetch did not produce usable content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    #[error("HTTP error, status {0}")]
    Status(u16),

    /// Request never completed.
    #[error("network error: {0}")]
    Network(String),

    /// Body could not be read or decoded.
    #[error("invalid response body: {0}")]
    Body(String),
}
