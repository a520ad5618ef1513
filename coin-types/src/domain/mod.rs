//! Domain models for the coin market-data client.

pub mod currency;

pub use currency::{CurrencyId, CurrencyRecord, ParseCurrencyIdError};
