//! Customer Service Message API
//!
//! Push messages to a follower within the 48-hour customer-service
//! window. The wire shape is `{"touser": ..., "msgtype": "text",
//! "text": {...}}` — the externally tagged enum below maps onto the
//! typed payload object, and `msgtype` is derived from the variant.

use std::sync::Arc;

use serde::Serialize;

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::types::ApiResponseBase;

use super::r#trait::{WechatApi, WechatContext};

/// One article of a news message (up to 10 per message).
#[derive(Debug, Clone, Serialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picurl: Option<String>,
}

/// Customer service message payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomMessage {
    Text {
        content: String,
    },
    Image {
        media_id: String,
    },
    Voice {
        media_id: String,
    },
    Video {
        media_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        thumb_media_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Music {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        musicurl: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hqmusicurl: Option<String>,
        thumb_media_id: String,
    },
    News {
        articles: Vec<NewsArticle>,
    },
}

impl CustomMessage {
    pub fn text(content: impl Into<String>) -> Self {
        CustomMessage::Text {
            content: content.into(),
        }
    }

    pub fn image(media_id: impl Into<String>) -> Self {
        CustomMessage::Image {
            media_id: media_id.into(),
        }
    }

    fn msgtype(&self) -> &'static str {
        match self {
            CustomMessage::Text { .. } => "text",
            CustomMessage::Image { .. } => "image",
            CustomMessage::Voice { .. } => "voice",
            CustomMessage::Video { .. } => "video",
            CustomMessage::Music { .. } => "music",
            CustomMessage::News { .. } => "news",
        }
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    touser: &'a str,
    msgtype: &'static str,
    #[serde(flatten)]
    message: &'a CustomMessage,
}

/// Customer Service Message API
pub struct MessageApi {
    context: Arc<WechatContext>,
}

impl MessageApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Send a customer service message
    ///
    /// POST /cgi-bin/message/custom/send?access_token=ACCESS_TOKEN
    ///
    /// Sending creates remote state; callers must not blindly retry a
    /// failed send.
    pub async fn send(&self, touser: &str, message: &CustomMessage) -> Result<(), WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let path =
            WechatClient::append_access_token("/cgi-bin/message/custom/send", &access_token);
        let body = SendRequest {
            touser,
            msgtype: message.msgtype(),
            message,
        };

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }
}

impl WechatApi for MessageApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "message"
    }
}
