//! Short URL API

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::client::WechatClient;
use crate::error::WechatError;

use super::r#trait::{WechatApi, WechatContext};

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct ShortUrlResponse {
    #[serde(default)]
    pub short_url: String,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Short URL API
pub struct ShortUrlApi {
    context: Arc<WechatContext>,
}

impl ShortUrlApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Convert a long URL into a short one
    ///
    /// POST /cgi-bin/shorturl?access_token=ACCESS_TOKEN
    pub async fn long2short(&self, long_url: &str) -> Result<String, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let path = WechatClient::append_access_token("/cgi-bin/shorturl", &access_token);
        let body = json!({"action": "long2short", "long_url": long_url});

        let response: ShortUrlResponse = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response.short_url)
    }
}

impl WechatApi for ShortUrlApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "shorturl"
    }
}
