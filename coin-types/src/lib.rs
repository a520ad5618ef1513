//! # Coin Types
//!
//! Domain types and port traits for the coin market-data client.
//! This crate has ZERO external IO dependencies - only data structures,
//! the error taxonomy, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Currency identifiers and opaque currency records
//! - `ports/` - Trait definitions that adapters must implement
//! - `error/` - Typed upstream error kinds

pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{CurrencyId, CurrencyRecord, ParseCurrencyIdError};
pub use error::CurrencyError;
pub use ports::{CryptoClient, RawResponse, Transport};
