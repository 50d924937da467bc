//! Scene QR Code API
//!
//! Temporary and permanent scene QR codes used for channel tracking.
//! Creating a code returns a ticket; the image itself is fetched from
//! the ticket-exchange URL.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::json;

use crate::client::WechatClient;
use crate::error::WechatError;

use super::r#trait::{WechatApi, WechatContext};

const SHOW_QRCODE_URL: &str = "https://mp.weixin.qq.com/cgi-bin/showqrcode";

/// Ticket returned by /cgi-bin/qrcode/create
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct QrcodeTicket {
    #[serde(default)]
    pub ticket: String,
    /// Only present for temporary codes
    #[serde(default)]
    pub expire_seconds: Option<u64>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Scene QR Code API
pub struct QrcodeApi {
    context: Arc<WechatContext>,
}

impl QrcodeApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    async fn create(&self, body: serde_json::Value) -> Result<QrcodeTicket, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let path = WechatClient::append_access_token("/cgi-bin/qrcode/create", &access_token);

        let response: QrcodeTicket = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// Create a temporary scene QR code (max 1800 seconds)
    ///
    /// POST /cgi-bin/qrcode/create?access_token=ACCESS_TOKEN
    pub async fn create_temporary(
        &self,
        scene_id: u32,
        expire_seconds: u32,
    ) -> Result<QrcodeTicket, WechatError> {
        self.create(json!({
            "expire_seconds": expire_seconds,
            "action_name": "QR_SCENE",
            "action_info": {"scene": {"scene_id": scene_id}}
        }))
        .await
    }

    /// Create a permanent scene QR code (scene_id 1..=100000)
    pub async fn create_permanent(&self, scene_id: u32) -> Result<QrcodeTicket, WechatError> {
        self.create(json!({
            "action_name": "QR_LIMIT_SCENE",
            "action_info": {"scene": {"scene_id": scene_id}}
        }))
        .await
    }

    /// Create a permanent scene QR code keyed by string (1-64 bytes)
    pub async fn create_permanent_str(&self, scene_str: &str) -> Result<QrcodeTicket, WechatError> {
        self.create(json!({
            "action_name": "QR_LIMIT_STR_SCENE",
            "action_info": {"scene": {"scene_str": scene_str}}
        }))
        .await
    }

    /// URL serving the QR code image for a ticket.
    ///
    /// The ticket must be percent-encoded; no access token is needed.
    pub fn show_qrcode_url(ticket: &str) -> String {
        format!(
            "{}?ticket={}",
            SHOW_QRCODE_URL,
            utf8_percent_encode(ticket, NON_ALPHANUMERIC)
        )
    }
}

impl WechatApi for QrcodeApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "qrcode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_parse_temporary() {
        let json = r#"{
            "ticket": "gQH47joAAAAAAAAAASxodHRwOi8vd2VpeGluLnFxLmNvbS9xL2taZ2Z3TVRtNzJXV1Brb3ZhYmJJAAIEZ23sUwMEmm3sUw==",
            "expire_seconds": 60,
            "url": "http://weixin.qq.com/q/kZgfwMTm72WWPkovabbI"
        }"#;
        let ticket: QrcodeTicket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.expire_seconds, Some(60));
        assert!(!ticket.ticket.is_empty());
    }

    #[test]
    fn test_ticket_parse_permanent_has_no_expiry() {
        let json = r#"{"ticket": "abc", "url": "http://weixin.qq.com/q/abc"}"#;
        let ticket: QrcodeTicket = serde_json::from_str(json).unwrap();
        assert!(ticket.expire_seconds.is_none());
    }

    #[test]
    fn test_show_qrcode_url_encodes_ticket() {
        let url = QrcodeApi::show_qrcode_url("abc+def==");
        assert_eq!(
            url,
            "https://mp.weixin.qq.com/cgi-bin/showqrcode?ticket=abc%2Bdef%3D%3D"
        );
    }
}
