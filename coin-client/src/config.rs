//! Configuration loading from environment.

use std::num::NonZeroUsize;
use std::time::Duration;

/// Production upstream host.
pub const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_CACHE_ENTRIES: NonZeroUsize = NonZeroUsize::new(100).unwrap();

const ENV_API_TOKEN: &str = "COIN_API_TOKEN";
const ENV_API_URL: &str = "COIN_API_URL";
const ENV_REQUEST_TIMEOUT: &str = "COIN_REQUEST_TIMEOUT_SECS";
const ENV_CACHE_TTL: &str = "COIN_CACHE_TTL_SECS";
const ENV_CACHE_MAX_ENTRIES: &str = "COIN_CACHE_MAX_ENTRIES";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("COIN_API_TOKEN environment variable is required and must not be empty")]
    MissingToken,

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct CoinMarketConfig {
    pub base_url: String,
    pub api_token: String,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub max_cache_entries: NonZeroUsize,
}

impl CoinMarketConfig {
    /// Creates a configuration with defaults for everything but the token.
    pub fn new(api_token: impl Into<String>) -> Result<Self, ConfigError> {
        let api_token = api_token.into().trim().to_string();
        if api_token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_cache_entries: DEFAULT_MAX_CACHE_ENTRIES,
        })
    }

    /// Overrides the upstream base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_max_cache_entries(mut self, max_entries: NonZeroUsize) -> Self {
        self.max_cache_entries = max_entries;
        self
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(ENV_API_TOKEN).ok_or(ConfigError::MissingToken)?;
        let mut config = Self::new(token)?;

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        if let Some(secs) = parse_var(&lookup, ENV_REQUEST_TIMEOUT)? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var(&lookup, ENV_CACHE_TTL)? {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(max) = parse_var(&lookup, ENV_CACHE_MAX_ENTRIES)? {
            config.max_cache_entries = usize::try_from(max)
                .ok()
                .and_then(NonZeroUsize::new)
                .ok_or_else(|| ConfigError::Invalid {
                    var: ENV_CACHE_MAX_ENTRIES,
                    value: max.to_string(),
                })?;
        }

        Ok(config)
    }
}

fn parse_var<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_token_is_required() {
        let err = CoinMarketConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingToken);
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let err = CoinMarketConfig::from_lookup(lookup(&[("COIN_API_TOKEN", "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingToken);
    }

    #[test]
    fn test_defaults() {
        let config = CoinMarketConfig::from_lookup(lookup(&[("COIN_API_TOKEN", "abc")])).unwrap();
        assert_eq!(config.api_token, "abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.max_cache_entries.get(), 100);
    }

    #[test]
    fn test_overrides() {
        let config = CoinMarketConfig::from_lookup(lookup(&[
            ("COIN_API_TOKEN", "abc"),
            ("COIN_API_URL", "http://localhost:9000/"),
            ("COIN_REQUEST_TIMEOUT_SECS", "3"),
            ("COIN_CACHE_TTL_SECS", "0"),
            ("COIN_CACHE_MAX_ENTRIES", "8"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.cache_ttl, Duration::ZERO);
        assert_eq!(config.max_cache_entries.get(), 8);
    }

    #[test]
    fn test_invalid_number() {
        let err = CoinMarketConfig::from_lookup(lookup(&[
            ("COIN_API_TOKEN", "abc"),
            ("COIN_CACHE_TTL_SECS", "five"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "COIN_CACHE_TTL_SECS",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_max_entries_rejected() {
        let err = CoinMarketConfig::from_lookup(lookup(&[
            ("COIN_API_TOKEN", "abc"),
            ("COIN_CACHE_MAX_ENTRIES", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_max_entries_beyond_usize_rejected() {
        let max = u64::MAX.to_string();
        let result = CoinMarketConfig::from_lookup(lookup(&[
            ("COIN_API_TOKEN", "abc"),
            ("COIN_CACHE_MAX_ENTRIES", &max),
        ]));

        match usize::try_from(u64::MAX) {
            Ok(fits) => assert_eq!(result.unwrap().max_cache_entries.get(), fits),
            Err(_) => assert_eq!(
                result.unwrap_err(),
                ConfigError::Invalid {
                    var: "COIN_CACHE_MAX_ENTRIES",
                    value: max.clone(),
                }
            ),
        }
    }
}
