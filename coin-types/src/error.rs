//! Error types for the coin market-data client.

/// Typed upstream failure kinds.
///
/// Every variant is a terminal signal for one request attempt; no retry state
/// is carried. The type is `Clone` so one failed upstream call can be handed
/// to every caller that was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurrencyError {
    /// Upstream answered 429. Callers must back off.
    #[error("Upstream rate limit exceeded")]
    RateLimited,

    /// Upstream answered 401. The API key is missing or invalid.
    #[error("Upstream rejected the API key")]
    Unauthenticated,

    /// Any other upstream or transport failure. The text is diagnostic only.
    #[error("API Error: {0}")]
    UpstreamFailure(String),
}

impl CurrencyError {
    /// Builds an `UpstreamFailure` from anything printable.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFailure(message.into())
    }
}
