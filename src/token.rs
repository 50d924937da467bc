//! Access token management
//!
//! Holds the current `access_token` in memory, refreshes it on expiry,
//! and serializes refreshes so concurrent callers await one in-flight
//! fetch instead of racing the vendor endpoint. Tokens are never
//! persisted; that is the embedding application's responsibility.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::types::AccessToken;

struct CachedToken {
    token: AccessToken,
    expires_at: Instant,
}

impl CachedToken {
    fn is_expired(&self, buffer: Duration) -> bool {
        Instant::now() + buffer >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    errcode: i32,
    #[serde(default)]
    errmsg: String,
}

impl TokenResponse {
    fn is_success(&self) -> bool {
        self.errcode == 0
    }
}

/// Manages the access_token lifecycle with automatic refresh.
///
/// The cache lock is held across the refresh HTTP call, which is what
/// gives single-flight semantics: a second caller blocks on the lock and
/// then finds a fresh token already cached. Each refresh is a single
/// attempt; there is no retry policy at this layer.
pub struct TokenManager {
    client: WechatClient,
    cache: Mutex<Option<CachedToken>>,
    refresh_buffer: Duration,
}

impl TokenManager {
    pub fn new(client: WechatClient) -> Self {
        Self {
            client,
            cache: Mutex::new(None),
            refresh_buffer: Duration::from_secs(5 * 60),
        }
    }

    /// Get the current access token, refreshing it if missing or about
    /// to expire.
    ///
    /// # Errors
    /// Returns [`WechatError::Token`] when the vendor rejects the
    /// credential fetch or returns an empty token.
    pub async fn get_token(&self) -> Result<String, WechatError> {
        let mut cache = self.cache.lock().await;

        if let Some(ref cached) = *cache {
            if !cached.is_expired(self.refresh_buffer) {
                return Ok(cached.token.as_str().to_string());
            }
        }

        let response = self.fetch_token().await?;

        let token = AccessToken::new(response.access_token).map_err(WechatError::Token)?;

        *cache = Some(CachedToken {
            token: token.clone(),
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });
        Ok(token.as_str().to_string())
    }

    /// Force a refresh, ignoring any cached value.
    pub async fn refresh(&self) -> Result<String, WechatError> {
        let mut cache = self.cache.lock().await;
        *cache = None;

        let response = self.fetch_token().await?;
        let token = AccessToken::new(response.access_token).map_err(WechatError::Token)?;

        *cache = Some(CachedToken {
            token: token.clone(),
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });
        Ok(token.as_str().to_string())
    }

    async fn fetch_token(&self) -> Result<TokenResponse, WechatError> {
        let path = "/cgi-bin/token";
        let query = [
            ("grant_type", "client_credential"),
            ("appid", self.client.appid()),
            ("secret", self.client.secret()),
        ];

        let response: TokenResponse = match self.client.get(path, &query).await {
            Ok(response) => response,
            // The transport classifies errcode != 0 as an Api error;
            // for the credential fetch itself that is a Token failure.
            Err(WechatError::Api { code, message }) => {
                return Err(WechatError::Token(format!(
                    "token fetch failed (code={}): {}",
                    code, message
                )))
            }
            Err(e) => return Err(e),
        };

        if !response.is_success() {
            return Err(WechatError::Token(format!(
                "token fetch failed (code={}): {}",
                response.errcode, response.errmsg
            )));
        }
        Ok(response)
    }

    /// Drop the cached token; the next call fetches a fresh one.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        *cache = None;
    }
}
