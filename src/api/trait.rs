//! Shared context for API modules
//!
//! Endpoint groups are flat modules sharing one context (HTTP client +
//! token manager) rather than a tree of owned manager objects.

use std::sync::Arc;

use crate::client::WechatClient;
use crate::token::TokenManager;

/// Context holding shared resources for API implementations.
#[derive(Clone)]
pub struct WechatContext {
    pub(crate) client: Arc<WechatClient>,
    pub(crate) token_manager: Arc<TokenManager>,
}

impl std::fmt::Debug for WechatContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatContext")
            .field("client", &"WechatClient { .. }")
            .field("token_manager", &"TokenManager { .. }")
            .finish()
    }
}

impl WechatContext {
    /// Create a new WechatContext
    pub fn new(client: Arc<WechatClient>, token_manager: Arc<TokenManager>) -> Self {
        Self {
            client,
            token_manager,
        }
    }

    /// Get a reference to the HTTP client.
    pub fn client(&self) -> &WechatClient {
        &self.client
    }

    /// Get a reference to the token manager.
    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }
}

/// Trait for API implementations.
///
/// All API modules implement this trait to expose the shared context.
pub trait WechatApi: Send + Sync {
    /// Get a reference to the shared context
    fn context(&self) -> &WechatContext;

    /// Name of this API group for logging and error context.
    fn api_name(&self) -> &'static str {
        "unknown"
    }
}
