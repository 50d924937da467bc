//! Permanent Material API
//!
//! Permanent counterparts of the temporary media endpoints: uploaded
//! files and news articles stay until deleted and count against the
//! account's material quota.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::types::ApiResponseBase;

use super::media::MediaType;
use super::r#trait::{WechatApi, WechatContext};

/// One article of a permanent news material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermanentArticle {
    pub title: String,
    /// media_id of the permanent image used as the cover
    pub thumb_media_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// 1 shows the cover inside the article body, 0 hides it
    #[serde(default)]
    pub show_cover_pic: i32,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_source_url: Option<String>,
}

/// Title and introduction required when uploading a permanent video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDescription {
    pub title: String,
    pub introduction: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialAddResponse {
    #[serde(default)]
    pub media_id: String,
    /// Only set for image uploads
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialCountResponse {
    #[serde(default)]
    pub voice_count: u64,
    #[serde(default)]
    pub video_count: u64,
    #[serde(default)]
    pub image_count: u64,
    #[serde(default)]
    pub news_count: u64,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// One page of the material inventory. Item shapes differ per material
/// type (news items carry `content`, files carry `name`/`url`), so the
/// entries stay untyped.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialBatchResponse {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub item_count: i64,
    #[serde(default)]
    pub item: Vec<Value>,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// What a permanent material download returned: raw file bytes for
/// image/voice/thumb materials, a JSON document for news and video.
#[derive(Debug, Clone)]
pub enum MaterialContent {
    File(Vec<u8>),
    Json(Value),
}

/// Permanent Material API
pub struct MaterialApi {
    context: Arc<WechatContext>,
}

impl MaterialApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    async fn token_path(&self, path: &str) -> Result<String, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        Ok(WechatClient::append_access_token(path, &access_token))
    }

    /// Create a permanent news material from up to 8 articles
    ///
    /// POST /cgi-bin/material/add_news?access_token=ACCESS_TOKEN
    pub async fn add_news(&self, articles: &[PermanentArticle]) -> Result<String, WechatError> {
        let path = self.token_path("/cgi-bin/material/add_news").await?;
        let body = serde_json::json!({"articles": articles});

        let response: MaterialAddResponse = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response.media_id)
    }

    /// Replace one article of an existing news material
    ///
    /// POST /cgi-bin/material/update_news?access_token=ACCESS_TOKEN
    pub async fn update_news(
        &self,
        media_id: &str,
        index: u32,
        article: &PermanentArticle,
    ) -> Result<(), WechatError> {
        let path = self.token_path("/cgi-bin/material/update_news").await?;
        let body = serde_json::json!({
            "media_id": media_id,
            "index": index,
            "articles": article
        });

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Upload a permanent media file from disk; videos require a
    /// description alongside the file part
    ///
    /// POST /cgi-bin/material/add_material?access_token=ACCESS_TOKEN&type=TYPE
    pub async fn add_material(
        &self,
        media_type: MediaType,
        file_path: &Path,
        description: Option<&VideoDescription>,
    ) -> Result<MaterialAddResponse, WechatError> {
        let path = self
            .token_path(&format!(
                "/cgi-bin/material/add_material?type={}",
                media_type.as_str()
            ))
            .await?;

        let mut params = Map::new();
        params.insert(
            "media".to_string(),
            Value::String(format!("@{}", file_path.display())),
        );
        if let Some(description) = description {
            params.insert(
                "description".to_string(),
                Value::String(serde_json::to_string(description)?),
            );
        }

        let response: MaterialAddResponse =
            self.context.client.post_multipart(&path, &params).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// Download a permanent material
    ///
    /// POST /cgi-bin/material/get_material?access_token=ACCESS_TOKEN
    ///
    /// News and video materials come back as a JSON document; all other
    /// types come back as the raw file. A JSON error body is surfaced as
    /// [`WechatError::Api`] instead of being handed out as content.
    pub async fn get_material(&self, media_id: &str) -> Result<MaterialContent, WechatError> {
        let path = self.token_path("/cgi-bin/material/get_material").await?;
        let body = serde_json::json!({"media_id": media_id});

        let response = self.context.client.post_raw(&path, &body).await?;

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
                return Ok(MaterialContent::Json(value));
            }
        }

        Ok(MaterialContent::File(bytes.to_vec()))
    }

    /// Delete a permanent material
    ///
    /// POST /cgi-bin/material/del_material?access_token=ACCESS_TOKEN
    pub async fn del_material(&self, media_id: &str) -> Result<(), WechatError> {
        let path = self.token_path("/cgi-bin/material/del_material").await?;
        let body = serde_json::json!({"media_id": media_id});

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Get the per-type material totals
    ///
    /// GET /cgi-bin/material/get_materialcount?access_token=ACCESS_TOKEN
    pub async fn get_material_count(&self) -> Result<MaterialCountResponse, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let query = [("access_token", access_token.as_str())];

        let response: MaterialCountResponse = self
            .context
            .client
            .get("/cgi-bin/material/get_materialcount", &query)
            .await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// Page through the material inventory of one type; `count` caps at
    /// 20 on the vendor side
    ///
    /// POST /cgi-bin/material/batchget_material?access_token=ACCESS_TOKEN
    pub async fn batch_get_material(
        &self,
        media_type: MediaType,
        offset: u32,
        count: u32,
    ) -> Result<MaterialBatchResponse, WechatError> {
        let path = self.token_path("/cgi-bin/material/batchget_material").await?;
        let body = serde_json::json!({
            "type": media_type.as_str(),
            "offset": offset,
            "count": count
        });

        let response: MaterialBatchResponse = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }
}

impl WechatApi for MaterialApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "material"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppId, AppSecret};
    use crate::WechatClient;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_context(base_url: &str) -> Arc<WechatContext> {
        let appid = AppId::new("wx1234567890abcdef").unwrap();
        let secret = AppSecret::new("secret1234567890ab").unwrap();
        let client = Arc::new(
            WechatClient::builder()
                .appid(appid)
                .secret(secret)
                .base_url(base_url)
                .build()
                .unwrap(),
        );
        let token_manager = Arc::new(crate::token::TokenManager::new((*client).clone()));
        Arc::new(WechatContext::new(client, token_manager))
    }

    async fn mount_token(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/cgi-bin/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test_token",
                "expires_in": 7200
            })))
            .mount(mock_server)
            .await;
    }

    fn sample_article() -> PermanentArticle {
        PermanentArticle {
            title: "今日头条".to_string(),
            thumb_media_id: "THUMB_MEDIA_ID".to_string(),
            author: Some("编辑部".to_string()),
            digest: None,
            show_cover_pic: 1,
            content: "<p>正文</p>".to_string(),
            content_source_url: Some("http://example.com/origin".to_string()),
        }
    }

    #[test]
    fn test_article_serialization_skips_unset_fields() {
        let mut article = sample_article();
        article.author = None;
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["title"], "今日头条");
        assert_eq!(json["show_cover_pic"], 1);
        assert!(json.get("author").is_none());
        assert!(json.get("digest").is_none());
    }

    #[test]
    fn test_count_response_parse() {
        let json = r#"{"voice_count": 1, "video_count": 2, "image_count": 3, "news_count": 4}"#;
        let response: MaterialCountResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.voice_count, 1);
        assert_eq!(response.news_count, 4);
    }

    #[test]
    fn test_batch_response_parse() {
        let json = r#"{
            "total_count": 2,
            "item_count": 2,
            "item": [
                {"media_id": "M1", "name": "a.jpg", "url": "http://example.com/a.jpg", "update_time": 1380000000},
                {"media_id": "M2", "name": "b.jpg", "url": "http://example.com/b.jpg", "update_time": 1380000001}
            ]
        }"#;
        let response: MaterialBatchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_count, 2);
        assert_eq!(response.item[0]["media_id"], "M1");
    }

    #[tokio::test]
    async fn test_add_news_returns_media_id() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/material/add_news"))
            .and(query_param("access_token", "test_token"))
            .and(body_partial_json(serde_json::json!({
                "articles": [{"title": "今日头条"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "media_id": "NEWS_MEDIA_ID"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let material_api = MaterialApi::new(create_test_context(&mock_server.uri()));
        let media_id = material_api.add_news(&[sample_article()]).await.unwrap();
        assert_eq!(media_id, "NEWS_MEDIA_ID");
    }

    #[tokio::test]
    async fn test_add_material_sends_video_description() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/material/add_material"))
            .and(query_param("type", "video"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "media_id": "VIDEO_MEDIA_ID",
                "url": ""
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = std::env::temp_dir();
        let file_path = dir.join("wechat_pub_sdk_material_test.mp4");
        tokio::fs::write(&file_path, b"video bytes").await.unwrap();

        let description = VideoDescription {
            title: "片名".to_string(),
            introduction: "简介".to_string(),
        };
        let material_api = MaterialApi::new(create_test_context(&mock_server.uri()));
        let response = material_api
            .add_material(MediaType::Video, &file_path, Some(&description))
            .await
            .unwrap();
        assert_eq!(response.media_id, "VIDEO_MEDIA_ID");

        tokio::fs::remove_file(&file_path).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_material_file_bytes() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/material/get_material"))
            .and(body_partial_json(serde_json::json!({"media_id": "IMG_ID"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(b"jpeg_bytes" as &[u8], "image/jpeg"),
            )
            .mount(&mock_server)
            .await;

        let material_api = MaterialApi::new(create_test_context(&mock_server.uri()));
        match material_api.get_material("IMG_ID").await.unwrap() {
            MaterialContent::File(bytes) => assert_eq!(bytes, b"jpeg_bytes"),
            other => panic!("expected file content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_material_news_json() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/material/get_material"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "news_item": [{"title": "今日头条", "content": "<p>正文</p>"}]
            })))
            .mount(&mock_server)
            .await;

        let material_api = MaterialApi::new(create_test_context(&mock_server.uri()));
        match material_api.get_material("NEWS_ID").await.unwrap() {
            MaterialContent::Json(value) => {
                assert_eq!(value["news_item"][0]["title"], "今日头条");
            }
            other => panic!("expected json content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_material_error_body_surfaces_as_api_error() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/material/get_material"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errcode": 40007,
                "errmsg": "invalid media_id"
            })))
            .mount(&mock_server)
            .await;

        let material_api = MaterialApi::new(create_test_context(&mock_server.uri()));
        let result = material_api.get_material("BAD_ID").await;
        match result {
            Err(WechatError::Api { code, .. }) => assert_eq!(code, 40007),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
