//! Crypto client port.
//!
//! The capability the outer layers (CLI, any future route layer) consume.

use crate::domain::{CurrencyId, CurrencyRecord};
use crate::error::CurrencyError;

/// Read-only access to upstream currency data.
#[async_trait::async_trait]
pub trait CryptoClient: Send + Sync {
    /// Lists all currencies. An absent payload yields an empty list.
    async fn list_currencies(&self) -> Result<Vec<CurrencyRecord>, CurrencyError>;

    /// Gets one currency by id.
    ///
    /// An unknown id is NOT an error: it yields an empty record
    /// (see [`CurrencyRecord::is_empty`]).
    async fn get_currency(&self, id: CurrencyId) -> Result<CurrencyRecord, CurrencyError>;
}
