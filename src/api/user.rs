//! User Management API
//!
//! Follower profile lookup, follower list paging, and remark updates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::types::ApiResponseBase;

use super::r#trait::{WechatApi, WechatContext};

/// Follower profile returned by /cgi-bin/user/info
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    /// 0 when the user unfollowed; the remaining fields are then absent
    #[serde(default)]
    pub subscribe: i32,
    #[serde(default)]
    pub openid: String,
    #[serde(default)]
    pub nickname: String,
    /// 1 male, 2 female, 0 unknown
    #[serde(default)]
    pub sex: i32,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub headimgurl: String,
    #[serde(default)]
    pub subscribe_time: i64,
    #[serde(default)]
    pub unionid: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub groupid: Option<i64>,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// One page of follower openids from /cgi-bin/user/get
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct FollowerList {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub data: Option<FollowerData>,
    #[serde(default)]
    pub next_openid: String,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowerData {
    #[serde(default)]
    pub openid: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateRemarkRequest<'a> {
    openid: &'a str,
    remark: &'a str,
}

/// User Management API
pub struct UserApi {
    context: Arc<WechatContext>,
}

impl UserApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Get a follower's profile
    ///
    /// GET /cgi-bin/user/info?access_token=TOKEN&openid=OPENID&lang=zh_CN
    pub async fn get_user_info(&self, openid: &str, lang: &str) -> Result<UserInfo, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let query = [
            ("access_token", access_token.as_str()),
            ("openid", openid),
            ("lang", lang),
        ];

        let response: UserInfo = self.context.client.get("/cgi-bin/user/info", &query).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// List follower openids, 10000 per page
    ///
    /// GET /cgi-bin/user/get?access_token=TOKEN&next_openid=NEXT
    ///
    /// Pass the previous page's `next_openid` to continue; `None` starts
    /// from the beginning.
    pub async fn get_followers(
        &self,
        next_openid: Option<&str>,
    ) -> Result<FollowerList, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let mut query = vec![("access_token", access_token.as_str())];
        if let Some(next) = next_openid {
            query.push(("next_openid", next));
        }

        let response: FollowerList = self.context.client.get("/cgi-bin/user/get", &query).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// Set the remark name for a follower (30 chars max)
    ///
    /// POST /cgi-bin/user/info/updateremark?access_token=ACCESS_TOKEN
    pub async fn update_remark(&self, openid: &str, remark: &str) -> Result<(), WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        let path =
            WechatClient::append_access_token("/cgi-bin/user/info/updateremark", &access_token);
        let body = UpdateRemarkRequest { openid, remark };

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }
}

impl WechatApi for UserApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "user"
    }
}
