//! JS-SDK API
//!
//! Fetches the jsapi ticket and produces the signed package consumed by
//! `wx.config` on the page. The signature covers jsapi_ticket, noncestr,
//! timestamp and the page URL (without its fragment), canonicalized and
//! hashed with SHA-1.
//!
//! The jsapi ticket has a tight daily fetch quota; embedding
//! applications should cache [`JsapiTicketResponse::expires_in`] worth
//! of ticket globally rather than calling [`JssdkApi::get_jsapi_ticket`]
//! per page view.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::WechatError;
use crate::sign::{canonicalize, sign, SigningRecipe};

use super::r#trait::{WechatApi, WechatContext};

/// Response from /cgi-bin/ticket/getticket
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct JsapiTicketResponse {
    #[serde(default)]
    pub ticket: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Everything `wx.config` needs on the page.
#[derive(Debug, Clone, Serialize)]
pub struct JsapiSignPackage {
    #[serde(rename = "appId")]
    pub app_id: String,
    #[serde(rename = "nonceStr")]
    pub nonce_str: String,
    pub timestamp: u64,
    pub url: String,
    pub signature: String,
    /// The exact canonical string that was signed, for debugging
    #[serde(rename = "rawString")]
    pub raw_string: String,
}

/// JS-SDK API
pub struct JssdkApi {
    context: Arc<WechatContext>,
}

impl JssdkApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Fetch the jsapi ticket
    ///
    /// GET /cgi-bin/ticket/getticket?access_token=TOKEN&type=jsapi
    pub async fn get_jsapi_ticket(&self) -> Result<JsapiTicketResponse, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let query = [
            ("access_token", access_token.as_str()),
            ("type", "jsapi"),
        ];

        let response: JsapiTicketResponse = self
            .context
            .client
            .get("/cgi-bin/ticket/getticket", &query)
            .await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// Fetch a fresh ticket and sign the given page URL with a random
    /// nonce and the current timestamp.
    pub async fn sign_url(&self, url: &str) -> Result<JsapiSignPackage, WechatError> {
        let ticket = self.get_jsapi_ticket().await?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| WechatError::InvalidArgument(format!("system clock error: {e}")))?
            .as_secs();

        self.sign_url_with(url, &ticket.ticket, &nonce_str(), timestamp)
    }

    /// Sign a page URL with an explicit ticket, nonce and timestamp.
    ///
    /// The nonce and timestamp must be the ones handed to `wx.config`.
    pub fn sign_url_with(
        &self,
        url: &str,
        jsapi_ticket: &str,
        nonce_str: &str,
        timestamp: u64,
    ) -> Result<JsapiSignPackage, WechatError> {
        // The fragment never participates in the signature.
        let url = url.split('#').next().unwrap_or(url);

        let mut params = Map::new();
        params.insert(
            "jsapi_ticket".to_string(),
            Value::String(jsapi_ticket.to_string()),
        );
        params.insert("noncestr".to_string(), Value::String(nonce_str.to_string()));
        params.insert(
            "timestamp".to_string(),
            Value::String(timestamp.to_string()),
        );
        params.insert("url".to_string(), Value::String(url.to_string()));

        let raw_string = canonicalize(&params)?;
        let signature = sign(&raw_string, "", &SigningRecipe::jsapi_sha1())?;

        Ok(JsapiSignPackage {
            app_id: self.context.client.appid().to_string(),
            nonce_str: nonce_str.to_string(),
            timestamp,
            url: url.to_string(),
            signature,
            raw_string,
        })
    }
}

impl WechatApi for JssdkApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "jssdk"
    }
}

fn nonce_str() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppId, AppSecret};
    use crate::WechatClient;

    fn create_test_context() -> Arc<WechatContext> {
        let appid = AppId::new("wx1234567890abcdef").unwrap();
        let secret = AppSecret::new("secret1234567890ab").unwrap();
        let client = Arc::new(
            WechatClient::builder()
                .appid(appid)
                .secret(secret)
                .build()
                .unwrap(),
        );
        let token_manager = Arc::new(crate::token::TokenManager::new((*client).clone()));
        Arc::new(WechatContext::new(client, token_manager))
    }

    #[test]
    fn test_sign_url_with_documented_example() {
        let api = JssdkApi::new(create_test_context());
        let package = api
            .sign_url_with(
                "http://mp.weixin.qq.com",
                "sM4AOVdWfPE4DxkXGEs8VMCPGGVi4C3VM0P37wVUCFvkVAy_90u5h9nbSlYy3-Sl-HhTdfl2fzFy1AOcHKP7qg",
                "Wm3WZYTPz0wzccnW",
                1414587457,
            )
            .unwrap();

        assert_eq!(
            package.raw_string,
            "jsapi_ticket=sM4AOVdWfPE4DxkXGEs8VMCPGGVi4C3VM0P37wVUCFvkVAy_90u5h9nbSlYy3-Sl-HhTdfl2fzFy1AOcHKP7qg&noncestr=Wm3WZYTPz0wzccnW&timestamp=1414587457&url=http://mp.weixin.qq.com"
        );
        assert_eq!(package.signature, "f4d90daf4b3bca3078ab155816175ba34c443a7b");
        assert_eq!(package.app_id, "wx1234567890abcdef");
    }

    #[test]
    fn test_sign_url_strips_fragment() {
        let api = JssdkApi::new(create_test_context());
        let with_fragment = api
            .sign_url_with("http://example.com/page#anchor", "ticket", "nonce", 1)
            .unwrap();
        let without_fragment = api
            .sign_url_with("http://example.com/page", "ticket", "nonce", 1)
            .unwrap();
        assert_eq!(with_fragment.signature, without_fragment.signature);
        assert_eq!(with_fragment.url, "http://example.com/page");
    }

    #[test]
    fn test_nonce_str_varies() {
        let a = nonce_str();
        let b = nonce_str();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_ticket_response_parse() {
        let json = r#"{
            "errcode": 0,
            "errmsg": "ok",
            "ticket": "bxLdikRXVbTPdHSM05e5u5sUoXNKd8-41ZO3MhKoyN5OfkWITDGgnr2fwJ0m9E8NYzWKVZvdVtaUgWvsdshFKA",
            "expires_in": 7200
        }"#;
        let response: JsapiTicketResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.expires_in, 7200);
        assert!(!response.ticket.is_empty());
    }
}
