//! Currency Data Service
//!
//! Composes transport, classifier and cache into the two read operations.
//! Contains NO HTTP details - those live behind the `Transport` port.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use coin_types::{CryptoClient, CurrencyError, CurrencyId, CurrencyRecord, RawResponse, Transport};

use crate::cache::TtlCache;
use crate::classify::{classify, currency_payload, listing_payload};
use crate::config::{CoinMarketConfig, DEFAULT_CACHE_TTL, DEFAULT_MAX_CACHE_ENTRIES};
use crate::transport::HttpTransport;

pub const LISTINGS_PATH: &str = "/v1/cryptocurrency/listings/latest";
pub const QUOTES_PATH: &str = "/v2/cryptocurrency/quotes/latest";

/// Cache key: operation name plus its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Listing,
    CurrencyInfo(CurrencyId),
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Listing => write!(f, "listing"),
            CacheKey::CurrencyInfo(id) => write!(f, "currency_info:{}", id),
        }
    }
}

/// Cache tuning for the service.
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_entries: NonZeroUsize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            max_entries: DEFAULT_MAX_CACHE_ENTRIES,
        }
    }
}

/// Caching client for upstream currency data.
///
/// Generic over `T: Transport` - the adapter is injected at compile time.
/// Owns its cache; nothing is shared between service instances.
pub struct CoinMarketService<T: Transport> {
    transport: Arc<T>,
    cache: TtlCache<CacheKey, Value, CurrencyError>,
    ttl: Duration,
}

impl CoinMarketService<HttpTransport> {
    /// Builds the reqwest-backed service described by `config`.
    pub fn from_config(config: &CoinMarketConfig) -> Self {
        Self::new(
            HttpTransport::from_config(config),
            CacheSettings {
                ttl: config.cache_ttl,
                max_entries: config.max_cache_entries,
            },
        )
    }
}

impl<T: Transport> CoinMarketService<T> {
    /// Creates a service over the given transport.
    pub fn new(transport: T, settings: CacheSettings) -> Self {
        Self {
            transport: Arc::new(transport),
            cache: TtlCache::new(settings.max_entries),
            ttl: settings.ttl,
        }
    }

    /// Returns a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a reference to the response cache.
    pub fn cache(&self) -> &TtlCache<CacheKey, Value, CurrencyError> {
        &self.cache
    }

    /// Lists all currencies (cached for the configured TTL).
    #[tracing::instrument(skip(self))]
    pub async fn list_currencies(&self) -> Result<Vec<CurrencyRecord>, CurrencyError> {
        let transport = Arc::clone(&self.transport);
        let payload = self
            .cache
            .get_or_compute(CacheKey::Listing, self.ttl, move || async move {
                let envelope = fetch_envelope(transport, LISTINGS_PATH, Vec::new()).await?;
                Ok::<_, CurrencyError>(listing_payload(envelope))
            })
            .await?;

        Ok(match payload {
            Value::Array(items) => items.into_iter().map(CurrencyRecord::new).collect(),
            _ => Vec::new(),
        })
    }

    /// Gets one currency (cached per id for the configured TTL).
    ///
    /// Unknown ids yield an empty record, not an error.
    #[tracing::instrument(skip(self, id), fields(id = %id))]
    pub async fn get_currency(&self, id: CurrencyId) -> Result<CurrencyRecord, CurrencyError> {
        let transport = Arc::clone(&self.transport);
        let payload = self
            .cache
            .get_or_compute(CacheKey::CurrencyInfo(id), self.ttl, move || async move {
                let params = vec![("id", id.to_string())];
                let envelope = fetch_envelope(transport, QUOTES_PATH, params).await?;
                Ok::<_, CurrencyError>(currency_payload(envelope, id))
            })
            .await?;

        Ok(CurrencyRecord::new(payload))
    }

    /// Releases the transport session. Safe to call more than once.
    pub async fn close(&self) {
        self.transport.close().await;
    }
}

async fn fetch_envelope<T: Transport>(
    transport: Arc<T>,
    path: &'static str,
    params: Vec<(&'static str, String)>,
) -> Result<Value, CurrencyError> {
    let RawResponse { status, body } = transport.request(path, &params).await?;
    classify(status, body).inspect_err(|err| {
        tracing::warn!(path, status, error = %err, "Upstream request failed");
    })
}

#[async_trait::async_trait]
impl<T: Transport> CryptoClient for CoinMarketService<T> {
    async fn list_currencies(&self) -> Result<Vec<CurrencyRecord>, CurrencyError> {
        CoinMarketService::list_currencies(self).await
    }

    async fn get_currency(&self, id: CurrencyId) -> Result<CurrencyRecord, CurrencyError> {
        CoinMarketService::get_currency(self, id).await
    }
}
