//! Analytics (datacube) API
//!
//! User growth, article and interface statistics. Every call takes a
//! begin/end date range (inclusive, `YYYY-MM-DD`) and returns a `list`
//! of per-day items. The vendor caps the span per call (7 days for
//! user data, 1-3 days for article and interface data).

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::client::WechatClient;
use crate::error::WechatError;

use super::r#trait::{WechatApi, WechatContext};

/// Inclusive date range, `YYYY-MM-DD` on both ends.
#[derive(Debug, Clone)]
pub struct DateRange {
    pub begin_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(begin_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            begin_date: begin_date.into(),
            end_date: end_date.into(),
        }
    }
}

/// Daily new/cancelled follower counts, split by source
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummaryItem {
    #[serde(default)]
    pub ref_date: String,
    /// 0 all, 1 search, 17 card share, 30 qrcode scan, ...
    #[serde(default)]
    pub user_source: i32,
    #[serde(default)]
    pub new_user: i64,
    #[serde(default)]
    pub cancel_user: i64,
}

/// Daily cumulative follower count
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct UserCumulateItem {
    #[serde(default)]
    pub ref_date: String,
    #[serde(default)]
    pub cumulate_user: i64,
}

/// Daily article reach and engagement
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSummaryItem {
    #[serde(default)]
    pub ref_date: String,
    #[serde(default)]
    pub msgid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub int_page_read_user: i64,
    #[serde(default)]
    pub int_page_read_count: i64,
    #[serde(default)]
    pub ori_page_read_user: i64,
    #[serde(default)]
    pub ori_page_read_count: i64,
    #[serde(default)]
    pub share_user: i64,
    #[serde(default)]
    pub share_count: i64,
    #[serde(default)]
    pub add_to_fav_user: i64,
    #[serde(default)]
    pub add_to_fav_count: i64,
}

/// Daily API call volume and latency
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceSummaryItem {
    #[serde(default)]
    pub ref_date: String,
    #[serde(default)]
    pub callback_count: i64,
    #[serde(default)]
    pub fail_count: i64,
    #[serde(default)]
    pub total_time_cost: i64,
    #[serde(default)]
    pub max_time_cost: i64,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct DatacubeList<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Analytics API
pub struct DatacubeApi {
    context: Arc<WechatContext>,
}

impl DatacubeApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    async fn query<T>(&self, path: &str, range: &DateRange) -> Result<Vec<T>, WechatError>
    where
        T: serde::de::DeserializeOwned,
    {
        let access_token = self.context.token_manager.get_token().await?;
        let path = WechatClient::append_access_token(path, &access_token);
        let body = json!({
            "begin_date": range.begin_date,
            "end_date": range.end_date,
        });

        let response: DatacubeList<T> = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response.list)
    }

    /// Daily new and cancelled followers (max 7-day span)
    ///
    /// POST /datacube/getusersummary?access_token=TOKEN
    pub async fn get_user_summary(
        &self,
        range: &DateRange,
    ) -> Result<Vec<UserSummaryItem>, WechatError> {
        self.query("/datacube/getusersummary", range).await
    }

    /// Daily cumulative follower totals (max 7-day span)
    ///
    /// POST /datacube/getusercumulate?access_token=TOKEN
    pub async fn get_user_cumulate(
        &self,
        range: &DateRange,
    ) -> Result<Vec<UserCumulateItem>, WechatError> {
        self.query("/datacube/getusercumulate", range).await
    }

    /// Daily article reach and engagement (max 1-day span)
    ///
    /// POST /datacube/getarticlesummary?access_token=TOKEN
    pub async fn get_article_summary(
        &self,
        range: &DateRange,
    ) -> Result<Vec<ArticleSummaryItem>, WechatError> {
        self.query("/datacube/getarticlesummary", range).await
    }

    /// Daily API call statistics (max 30-day span)
    ///
    /// POST /datacube/getinterfacesummary?access_token=TOKEN
    pub async fn get_interface_summary(
        &self,
        range: &DateRange,
    ) -> Result<Vec<InterfaceSummaryItem>, WechatError> {
        self.query("/datacube/getinterfacesummary", range).await
    }
}

impl WechatApi for DatacubeApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "datacube"
    }
}
