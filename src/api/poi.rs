//! Store (POI) API
//!
//! Manage the Official Account's physical store listings. A submitted
//! store goes through vendor review; until it is approved the entry has
//! no `poi_id` and only carries the basic fields.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::types::ApiResponseBase;

use super::r#trait::{WechatApi, WechatContext};

/// One store photo; the list shows in the store page in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiPhoto {
    pub photo_url: String,
}

/// Store description, nested under `business.base_info` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiBaseInfo {
    /// Merchant's own store id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    pub province: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub address: String,
    pub telephone: String,
    /// Category path, e.g. `["美食,小吃快餐"]`
    pub categories: Vec<String>,
    /// Coordinate system marker; 1 is GCJ-02
    pub offset_type: i32,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_list: Vec<PoiPhoto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    /// Opening hours, 24h clock, e.g. `8:00-20:00`
    pub open_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<u32>,
    /// Assigned by the vendor once the store passes review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poi_id: Option<String>,
    /// Review state, present in query responses only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_state: Option<i32>,
}

impl PoiBaseInfo {
    /// A store with the required fields; optional fields start empty and
    /// can be set directly afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        business_name: impl Into<String>,
        province: impl Into<String>,
        city: impl Into<String>,
        address: impl Into<String>,
        telephone: impl Into<String>,
        categories: Vec<String>,
        offset_type: i32,
        longitude: f64,
        latitude: f64,
        open_time: impl Into<String>,
    ) -> Self {
        Self {
            sid: None,
            business_name: business_name.into(),
            branch_name: None,
            province: province.into(),
            city: city.into(),
            district: None,
            address: address.into(),
            telephone: telephone.into(),
            categories,
            offset_type,
            longitude,
            latitude,
            photo_list: Vec::new(),
            recommend: None,
            special: None,
            introduction: None,
            open_time: open_time.into(),
            avg_price: None,
            poi_id: None,
            available_state: None,
        }
    }
}

/// Fields the vendor allows changing after a store is created.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PoiUpdate {
    pub poi_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_list: Option<Vec<PoiPhoto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoiBusiness {
    pub base_info: PoiBaseInfo,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct PoiResponse {
    pub business: PoiBusiness,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct PoiListResponse {
    #[serde(default)]
    pub business_list: Vec<PoiBusiness>,
    /// The vendor sends this as either a number or a numeric string
    #[serde(default, deserialize_with = "int_or_string")]
    pub total_count: i64,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

fn int_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_i64().unwrap_or(0)),
        Value::String(s) => s.parse().map_err(serde::de::Error::custom),
        _ => Ok(0),
    }
}

/// Store (POI) API
pub struct PoiApi {
    context: Arc<WechatContext>,
}

impl PoiApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    async fn token_path(&self, path: &str) -> Result<String, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        Ok(WechatClient::append_access_token(path, &access_token))
    }

    /// Submit a store for review
    ///
    /// POST /cgi-bin/poi/addpoi?access_token=ACCESS_TOKEN
    pub async fn add(&self, poi: &PoiBaseInfo) -> Result<(), WechatError> {
        let path = self.token_path("/cgi-bin/poi/addpoi").await?;
        let body = serde_json::json!({"business": {"base_info": poi}});

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Query one store by its assigned id
    ///
    /// POST /cgi-bin/poi/getpoi?access_token=ACCESS_TOKEN
    pub async fn get(&self, poi_id: &str) -> Result<PoiBaseInfo, WechatError> {
        let path = self.token_path("/cgi-bin/poi/getpoi").await?;
        let body = serde_json::json!({"poi_id": poi_id});

        let response: PoiResponse = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response.business.base_info)
    }

    /// Page through all stores; `limit` caps at 50 on the vendor side
    ///
    /// POST /cgi-bin/poi/getpoilist?access_token=ACCESS_TOKEN
    pub async fn list(&self, begin: u32, limit: u32) -> Result<PoiListResponse, WechatError> {
        let path = self.token_path("/cgi-bin/poi/getpoilist").await?;
        let body = serde_json::json!({"begin": begin, "limit": limit});

        let response: PoiListResponse = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// Change a store's mutable fields; a change triggers re-review
    ///
    /// POST /cgi-bin/poi/updatepoi?access_token=ACCESS_TOKEN
    pub async fn update(&self, update: &PoiUpdate) -> Result<(), WechatError> {
        let path = self.token_path("/cgi-bin/poi/updatepoi").await?;
        let body = serde_json::json!({"business": {"base_info": update}});

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Delete a store; card and coupon features bound to it stop working
    ///
    /// POST /cgi-bin/poi/delpoi?access_token=ACCESS_TOKEN
    pub async fn delete(&self, poi_id: &str) -> Result<(), WechatError> {
        let path = self.token_path("/cgi-bin/poi/delpoi").await?;
        let body = serde_json::json!({"poi_id": poi_id});

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }
}

impl WechatApi for PoiApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "poi"
    }
}
