//! Upstream transport port.
//!
//! Adapters (reqwest, scripted mocks) implement this trait. The transport
//! only moves bytes and parses JSON; status interpretation happens in the
//! response classifier.

use serde_json::Value;

use crate::error::CurrencyError;

/// Status code plus parsed JSON body of one upstream response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// A 200 response carrying `body`.
    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }
}

/// Outbound GET transport bound to one upstream host.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Issues `GET {base}{path}?{params}`.
    ///
    /// Opens the underlying session on first use (or after `close`).
    /// Returns `Err` only for network-level faults; HTTP error statuses are
    /// returned as data.
    async fn request(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<RawResponse, CurrencyError>;

    /// Releases the session. No-op when never opened or already closed.
    async fn close(&self);
}
