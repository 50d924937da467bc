//! Temporary Media API
//!
//! Upload and download temporary media files (valid for 3 days).
//! Uploads go as multipart/form-data; downloads come back as raw bytes
//! unless the server answers with a JSON error body.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::WechatClient;
use crate::error::WechatError;

use super::r#trait::{WechatApi, WechatContext};

/// Media type for temporary media upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    /// Image file (jpg, png)
    Image,
    /// Voice file (mp3, wma, wav, amr)
    Voice,
    /// Video file (mp4)
    Video,
    /// Thumbnail file (jpg)
    Thumb,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Voice => "voice",
            MediaType::Video => "video",
            MediaType::Thumb => "thumb",
        }
    }
}

/// Response from temporary media upload
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploadResponse {
    #[serde(rename = "type", default)]
    pub media_type: String,
    #[serde(default)]
    pub media_id: String,
    /// Unix timestamp when the media was created
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Temporary Media API
pub struct MediaApi {
    context: Arc<WechatContext>,
}

impl MediaApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Upload a temporary media file from disk
    ///
    /// POST /cgi-bin/media/upload?access_token=ACCESS_TOKEN&type=TYPE
    ///
    /// The file is read under the `media` field; the handle is released
    /// before the request is dispatched.
    pub async fn upload(
        &self,
        media_type: MediaType,
        file_path: &Path,
    ) -> Result<MediaUploadResponse, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let path = WechatClient::append_access_token(
            &format!("/cgi-bin/media/upload?type={}", media_type.as_str()),
            &access_token,
        );

        let mut params = Map::new();
        params.insert(
            "media".to_string(),
            Value::String(format!("@{}", file_path.display())),
        );

        let response: MediaUploadResponse =
            self.context.client.post_multipart(&path, &params).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// Upload a temporary media file from an in-memory buffer
    pub async fn upload_bytes(
        &self,
        media_type: MediaType,
        filename: &str,
        data: &[u8],
    ) -> Result<MediaUploadResponse, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let url = format!(
            "{}{}",
            self.context.client.base_url(),
            WechatClient::append_access_token(
                &format!("/cgi-bin/media/upload?type={}", media_type.as_str()),
                &access_token,
            )
        );

        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("media", part);

        let request = self
            .context
            .client
            .http()
            .post(&url)
            .multipart(form)
            .build()?;
        let response = self.context.client.send_request(request).await?;
        if let Err(e) = response.error_for_status_ref() {
            return Err(e.into());
        }

        let result: MediaUploadResponse = response.json().await?;
        WechatError::check_api(result.errcode, &result.errmsg)?;
        Ok(result)
    }

    /// Download a temporary media file
    ///
    /// GET /cgi-bin/media/get?access_token=ACCESS_TOKEN&media_id=MEDIA_ID
    ///
    /// Returns the raw bytes. An expired or unknown media_id comes back
    /// as a JSON error body; that body is detected and surfaced as
    /// [`WechatError::Api`] instead of being handed out as media data.
    pub async fn download(&self, media_id: &str) -> Result<Vec<u8>, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let query = [
            ("access_token", access_token.as_str()),
            ("media_id", media_id),
        ];

        let response = self.context.client.get_raw("/cgi-bin/media/get", &query).await?;

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("json") || v.contains("text/plain"))
            .unwrap_or(false);

        let bytes = response.bytes().await?;

        if is_json {
            if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
                if let Some(errcode) = value.get("errcode").and_then(|v| v.as_i64()) {
                    if errcode != 0 {
                        let errmsg = value
                            .get("errmsg")
                            .and_then(|v| v.as_str())
                            .unwrap_or("unknown error");
                        return Err(WechatError::Api {
                            code: errcode.try_into().unwrap_or(i32::MAX),
                            message: errmsg.to_string(),
                        });
                    }
                }
            }
        }

        Ok(bytes.to_vec())
    }
}

impl WechatApi for MediaApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "media"
    }
}
