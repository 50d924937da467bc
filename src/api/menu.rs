//! Custom Menu API
//!
//! Create, query and delete the Official Account's custom menu.
//! A menu holds up to 3 top-level buttons; a button is either a leaf
//! (click event or view URL) or a parent holding up to 5 sub-buttons.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::types::ApiResponseBase;

use super::r#trait::{WechatApi, WechatContext};

/// One button of the custom menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuButton {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub button_type: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_button: Option<Vec<MenuButton>>,
}

impl MenuButton {
    /// A click button pushing a key event to the server.
    pub fn click(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            button_type: Some("click".to_string()),
            name: name.into(),
            key: Some(key.into()),
            url: None,
            sub_button: None,
        }
    }

    /// A view button opening a URL.
    pub fn view(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            button_type: Some("view".to_string()),
            name: name.into(),
            key: None,
            url: Some(url.into()),
            sub_button: None,
        }
    }

    /// A parent button holding sub-buttons; carries no type of its own.
    pub fn group(name: impl Into<String>, sub_button: Vec<MenuButton>) -> Self {
        Self {
            button_type: None,
            name: name.into(),
            key: None,
            url: None,
            sub_button: Some(sub_button),
        }
    }
}

/// Top-level menu payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub button: Vec<MenuButton>,
}

/// Response from GET /cgi-bin/menu/get
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MenuResponse {
    #[serde(default)]
    pub menu: Option<Menu>,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Custom Menu API
pub struct MenuApi {
    context: Arc<WechatContext>,
}

impl MenuApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Create (replace) the custom menu
    ///
    /// POST /cgi-bin/menu/create?access_token=ACCESS_TOKEN
    pub async fn create(&self, menu: &Menu) -> Result<(), WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let path = WechatClient::append_access_token("/cgi-bin/menu/create", &access_token);

        let response: ApiResponseBase = self.context.client.post(&path, menu).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Get the current custom menu
    ///
    /// GET /cgi-bin/menu/get?access_token=ACCESS_TOKEN
    pub async fn get(&self) -> Result<MenuResponse, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let query = [("access_token", access_token.as_str())];

        let response: MenuResponse = self.context.client.get("/cgi-bin/menu/get", &query).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// Delete the custom menu
    ///
    /// GET /cgi-bin/menu/delete?access_token=ACCESS_TOKEN
    pub async fn delete(&self) -> Result<(), WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let query = [("access_token", access_token.as_str())];

        let response: ApiResponseBase =
            self.context.client.get("/cgi-bin/menu/delete", &query).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Get the current self-menu configuration, including menus set
    /// through the web console rather than the API.
    ///
    /// GET /cgi-bin/get_current_selfmenu_info?access_token=ACCESS_TOKEN
    pub async fn get_current_selfmenu_info(&self) -> Result<serde_json::Value, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let query = [("access_token", access_token.as_str())];

        self.context
            .client
            .get("/cgi-bin/get_current_selfmenu_info", &query)
            .await
    }
}

impl WechatApi for MenuApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "menu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_button_serialization() {
        let button = MenuButton::click("今日歌曲", "V1001_TODAY_MUSIC");
        let json = serde_json::to_value(&button).unwrap();
        assert_eq!(json["type"], "click");
        assert_eq!(json["name"], "今日歌曲");
        assert_eq!(json["key"], "V1001_TODAY_MUSIC");
        assert!(json.get("url").is_none());
        assert!(json.get("sub_button").is_none());
    }

    #[test]
    fn test_view_button_serialization() {
        let button = MenuButton::view("搜索", "http://www.soso.com/");
        let json = serde_json::to_value(&button).unwrap();
        assert_eq!(json["type"], "view");
        assert_eq!(json["url"], "http://www.soso.com/");
        assert!(json.get("key").is_none());
    }

    #[test]
    fn test_group_button_has_no_type() {
        let button = MenuButton::group(
            "菜单",
            vec![
                MenuButton::view("视频", "http://v.qq.com/"),
                MenuButton::click("赞一下我们", "V1001_GOOD"),
            ],
        );
        let json = serde_json::to_value(&button).unwrap();
        assert!(json.get("type").is_none());
        assert_eq!(json["sub_button"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_menu_response_parse() {
        let json = r#"{
            "menu": {
                "button": [
                    {"type": "click", "name": "今日歌曲", "key": "V1001_TODAY_MUSIC", "sub_button": []}
                ]
            }
        }"#;
        let response: MenuResponse = serde_json::from_str(json).unwrap();
        let menu = response.menu.unwrap();
        assert_eq!(menu.button.len(), 1);
        assert_eq!(menu.button[0].name, "今日歌曲");
    }

    #[test]
    fn test_menu_response_error_parse() {
        let json = r#"{"errcode": 46003, "errmsg": "menu no exist"}"#;
        let response: MenuResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.errcode, 46003);
        assert!(response.menu.is_none());
    }
}
