//! Follower Group API
//!
//! Groups partition followers; a follower belongs to exactly one group.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::types::ApiResponseBase;

use super::r#trait::{WechatApi, WechatContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    /// Follower count; present in list responses only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct GroupResponse {
    pub group: Group,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct GroupListResponse {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct GroupIdResponse {
    #[serde(default)]
    pub groupid: i64,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Follower Group API
pub struct GroupApi {
    context: Arc<WechatContext>,
}

impl GroupApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    async fn token_path(&self, path: &str) -> Result<String, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        Ok(WechatClient::append_access_token(path, &access_token))
    }

    /// Create a group (30-char name max)
    ///
    /// POST /cgi-bin/groups/create?access_token=ACCESS_TOKEN
    pub async fn create(&self, name: &str) -> Result<Group, WechatError> {
        let path = self.token_path("/cgi-bin/groups/create").await?;
        let body = serde_json::json!({"group": {"name": name}});

        let response: GroupResponse = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response.group)
    }

    /// List all groups
    ///
    /// GET /cgi-bin/groups/get?access_token=ACCESS_TOKEN
    pub async fn list(&self) -> Result<Vec<Group>, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let query = [("access_token", access_token.as_str())];

        let response: GroupListResponse =
            self.context.client.get("/cgi-bin/groups/get", &query).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response.groups)
    }

    /// Rename a group
    ///
    /// POST /cgi-bin/groups/update?access_token=ACCESS_TOKEN
    pub async fn update(&self, id: i64, name: &str) -> Result<(), WechatError> {
        let path = self.token_path("/cgi-bin/groups/update").await?;
        let body = serde_json::json!({"group": {"id": id, "name": name}});

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Get the group a follower belongs to
    ///
    /// POST /cgi-bin/groups/getid?access_token=ACCESS_TOKEN
    pub async fn id_of(&self, openid: &str) -> Result<i64, WechatError> {
        let path = self.token_path("/cgi-bin/groups/getid").await?;
        let body = serde_json::json!({"openid": openid});

        let response: GroupIdResponse = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response.groupid)
    }

    /// Move a follower to another group
    ///
    /// POST /cgi-bin/groups/members/update?access_token=ACCESS_TOKEN
    pub async fn move_member(&self, openid: &str, to_groupid: i64) -> Result<(), WechatError> {
        let path = self.token_path("/cgi-bin/groups/members/update").await?;
        let body = serde_json::json!({"openid": openid, "to_groupid": to_groupid});

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Move up to 50 followers to another group in one call
    ///
    /// POST /cgi-bin/groups/members/batchupdate?access_token=ACCESS_TOKEN
    pub async fn batch_move(&self, openids: &[&str], to_groupid: i64) -> Result<(), WechatError> {
        let path = self.token_path("/cgi-bin/groups/members/batchupdate").await?;
        let body = serde_json::json!({"openid_list": openids, "to_groupid": to_groupid});

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }
}

impl WechatApi for GroupApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "group"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_response_parse() {
        let json = r#"{"group": {"id": 107, "name": "test"}}"#;
        let response: GroupResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.group.id, 107);
        assert_eq!(response.group.name, "test");
        assert!(response.group.count.is_none());
    }

    #[test]
    fn test_group_list_parse() {
        let json = r#"{
            "groups": [
                {"id": 0, "name": "未分组", "count": 72596},
                {"id": 1, "name": "黑名单", "count": 36}
            ]
        }"#;
        let response: GroupListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.groups.len(), 2);
        assert_eq!(response.groups[0].count, Some(72596));
    }

    #[test]
    fn test_group_id_response_parse() {
        let json = r#"{"groupid": 102}"#;
        let response: GroupIdResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.groupid, 102);
    }
}
