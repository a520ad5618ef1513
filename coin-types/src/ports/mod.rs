//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The service layer depends on these traits, not concrete implementations.

mod client;
mod transport;

pub use client::CryptoClient;
pub use transport::{RawResponse, Transport};
