//! # Coin Client
//!
//! Caching HTTP client for the CoinMarketCap market-data API.
//!
//! ## Architecture
//!
//! - `transport` - reqwest adapter with a lazily opened session
//! - `classify` - maps upstream status codes to [`CurrencyError`] kinds
//! - `cache` - bounded TTL cache with one in-flight computation per key
//! - `service` - [`CoinMarketService`], the [`CryptoClient`] implementation
//! - `config` - environment-driven configuration
//!
//! The service is generic over `T: Transport`, allowing a scripted
//! transport to be injected in tests.

pub mod cache;
pub mod classify;
pub mod config;
pub mod service;
pub mod transport;


pub use cache::TtlCache;
pub use config::{CoinMarketConfig, ConfigError};
pub use service::{CacheKey, CacheSettings, CoinMarketService};
pub use transport::{HttpTransport, SessionState};

pub use coin_types::{CryptoClient, CurrencyError, CurrencyId, CurrencyRecord, Transport};
