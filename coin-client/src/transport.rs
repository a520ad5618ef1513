//! reqwest transport with a lazily opened session.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tokio::sync::Mutex;

use coin_types::{CurrencyError, RawResponse, Transport};

use crate::config::{CoinMarketConfig, ConfigError};

/// Header carrying the upstream API key.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-cmc_pro_api_key");

/// Observable session lifecycle.
///
/// `Unopened --request--> Open`, `Open --close--> Closed`,
/// `Closed --request--> Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Open,
    Closed,
}

enum Session {
    Unopened,
    Open(Client),
    Closed,
}

impl Session {
    fn state(&self) -> SessionState {
        match self {
            Session::Unopened => SessionState::Unopened,
            Session::Open(_) => SessionState::Open,
            Session::Closed => SessionState::Closed,
        }
    }
}

/// HTTP transport bound to one upstream host and API key.
///
/// The reqwest client pools connections internally and is cheap to clone,
/// so the session lock is only held for state transitions.
pub struct HttpTransport {
    base_url: String,
    api_key: String,
    timeout: Duration,
    session: Mutex<Session>,
}

impl HttpTransport {
    /// Creates an unopened transport. A blank `api_key` is rejected.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self::unchecked(base_url.into(), api_key, timeout))
    }

    /// `CoinMarketConfig` already guarantees a non-empty token.
    pub fn from_config(config: &CoinMarketConfig) -> Self {
        Self::unchecked(
            config.base_url.clone(),
            config.api_token.clone(),
            config.request_timeout,
        )
    }

    fn unchecked(base_url: String, api_key: String, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
            session: Mutex::new(Session::Unopened),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current session state.
    pub async fn session_state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    async fn client(&self) -> Result<Client, CurrencyError> {
        let mut session = self.session.lock().await;
        if let Session::Open(client) = &*session {
            return Ok(client.clone());
        }

        let reopening = matches!(*session, Session::Closed);
        let client = self.build_client()?;
        *session = Session::Open(client.clone());
        tracing::info!(base_url = %self.base_url, reopening, "Opened upstream session");
        Ok(client)
    }

    fn build_client(&self) -> Result<Client, CurrencyError> {
        let mut key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| CurrencyError::upstream("API key is not a valid header value"))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .user_agent(concat!("coin-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CurrencyError::upstream(format!("failed to build HTTP client: {e}")))
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<RawResponse, CurrencyError> {
        let client = self.client().await?;

        let mut req = client.get(format!("{}{}", self.base_url, path));
        if !params.is_empty() {
            req = req.query(params);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                CurrencyError::upstream(format!("request timeout: {e}"))
            } else if e.is_connect() {
                CurrencyError::upstream(format!("connection failed: {e}"))
            } else {
                CurrencyError::upstream(format!("request failed: {e}"))
            }
        })?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| CurrencyError::upstream(format!("failed to read response body: {e}")))?;

        // Error statuses are still classified when the body is not JSON.
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(e) if status == 200 => {
                return Err(CurrencyError::upstream(format!(
                    "malformed JSON from upstream: {e}"
                )));
            }
            Err(_) => Value::Null,
        };

        tracing::debug!(path, status, "Upstream response");
        Ok(RawResponse::new(status, body))
    }

    async fn close(&self) {
        let mut session = self.session.lock().await;
        if let Session::Open(_) = &*session {
            *session = Session::Closed;
            tracing::info!(base_url = %self.base_url, "Closed upstream session");
        }
    }
}
