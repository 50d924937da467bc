//! Card/Coupon API
//!
//! Vendor loyalty cards and vouchers. Every card kind shares a
//! [`BaseInfo`] block and adds a handful of kind-specific fields; the
//! wire shape nests both under a per-kind key:
//!
//! ```json
//! {"card": {"card_type": "CASH", "cash": {"base_info": {...}, "reduce_cost": 100}}}
//! ```
//!
//! [`CardPayload`] models this as one sum type instead of a subclass
//! per kind.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::types::ApiResponseBase;

use super::r#trait::{WechatApi, WechatContext};

/// How the code is presented when the card is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeType {
    #[serde(rename = "CODE_TYPE_TEXT")]
    Text,
    #[serde(rename = "CODE_TYPE_BARCODE")]
    Barcode,
    #[serde(rename = "CODE_TYPE_QRCODE")]
    Qrcode,
}

/// Validity window of a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DateInfo {
    /// Valid between two fixed timestamps
    #[serde(rename = "DATE_TYPE_FIX_TIME_RANGE")]
    FixTimeRange {
        begin_timestamp: u64,
        end_timestamp: u64,
    },
    /// Valid for `fixed_term` days starting `fixed_begin_term` days
    /// after claiming
    #[serde(rename = "DATE_TYPE_FIX_TERM")]
    FixTerm {
        fixed_term: u32,
        fixed_begin_term: u32,
    },
}

/// Stock quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
    pub quantity: u64,
}

/// Fields shared by every card kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseInfo {
    pub logo_url: String,
    pub brand_name: String,
    pub code_type: CodeType,
    pub title: String,
    /// Color name from the vendor palette, e.g. "Color010"
    pub color: String,
    pub notice: String,
    pub description: String,
    pub date_info: DateInfo,
    pub sku: Sku,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id_list: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_custom_code: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_openid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_share: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_give_friend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_url_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl BaseInfo {
    /// A base info block with only the required fields set.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        logo_url: impl Into<String>,
        brand_name: impl Into<String>,
        code_type: CodeType,
        title: impl Into<String>,
        color: impl Into<String>,
        notice: impl Into<String>,
        description: impl Into<String>,
        date_info: DateInfo,
        sku: Sku,
    ) -> Self {
        Self {
            logo_url: logo_url.into(),
            brand_name: brand_name.into(),
            code_type,
            title: title.into(),
            color: color.into(),
            notice: notice.into(),
            description: description.into(),
            date_info,
            sku,
            sub_title: None,
            service_phone: None,
            location_id_list: None,
            use_custom_code: None,
            bind_openid: None,
            can_share: None,
            can_give_friend: None,
            get_limit: None,
            custom_url_name: None,
            custom_url: None,
            source: None,
        }
    }
}

/// Kind-specific card fields. Serialized untagged: the discriminant
/// lives in `card_type` and the nesting key, not in these fields.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CardKind {
    GeneralCoupon {
        default_detail: String,
    },
    Groupon {
        deal_detail: String,
    },
    Discount {
        /// Percentage off, e.g. 30 for 30% off
        discount: u32,
    },
    Gift {
        gift: String,
    },
    Cash {
        /// Minimum spend in cents
        #[serde(skip_serializing_if = "Option::is_none")]
        least_cost: Option<u32>,
        /// Amount off in cents
        reduce_cost: u32,
    },
    MemberCard {
        supply_bonus: bool,
        supply_balance: bool,
        prerogative: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        bonus_cleared: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bonus_rules: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        balance_rules: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bind_old_card_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        activate_url: Option<String>,
    },
    ScenicTicket {
        #[serde(skip_serializing_if = "Option::is_none")]
        ticket_class: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        guide_url: Option<String>,
    },
    MovieTicket {
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    BoardingPass {
        from: String,
        to: String,
        flight: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        departure_time: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        landing_time: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        check_in_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        gate: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        boarding_time: Option<String>,
    },
    LuckyMoney {},
}

impl CardKind {
    /// Vendor `card_type` constant
    pub fn card_type(&self) -> &'static str {
        match self {
            CardKind::GeneralCoupon { .. } => "GENERAL_COUPON",
            CardKind::Groupon { .. } => "GROUPON",
            CardKind::Discount { .. } => "DISCOUNT",
            CardKind::Gift { .. } => "GIFT",
            CardKind::Cash { .. } => "CASH",
            CardKind::MemberCard { .. } => "MEMBER_CARD",
            CardKind::ScenicTicket { .. } => "SCENIC_TICKET",
            CardKind::MovieTicket { .. } => "MOVIE_TICKET",
            CardKind::BoardingPass { .. } => "BOARDING_PASS",
            CardKind::LuckyMoney {} => "LUCKY_MONEY",
        }
    }

    /// Key the kind-specific object nests under
    pub fn nesting_key(&self) -> &'static str {
        match self {
            CardKind::GeneralCoupon { .. } => "general_coupon",
            CardKind::Groupon { .. } => "groupon",
            CardKind::Discount { .. } => "discount",
            CardKind::Gift { .. } => "gift",
            CardKind::Cash { .. } => "cash",
            CardKind::MemberCard { .. } => "member_card",
            CardKind::ScenicTicket { .. } => "scenic_ticket",
            CardKind::MovieTicket { .. } => "movie_ticket",
            CardKind::BoardingPass { .. } => "boarding_pass",
            CardKind::LuckyMoney {} => "lucky_money",
        }
    }
}

/// A complete card definition: shared base info plus kind fields.
#[derive(Debug, Clone)]
pub struct CardPayload {
    pub base_info: BaseInfo,
    pub kind: CardKind,
}

impl CardPayload {
    pub fn new(base_info: BaseInfo, kind: CardKind) -> Self {
        Self { base_info, kind }
    }

    /// Kind fields and base info merged under the nesting key.
    fn inner_object(&self) -> Result<Value, WechatError> {
        let mut inner = match serde_json::to_value(&self.kind)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        inner.insert("base_info".to_string(), serde_json::to_value(&self.base_info)?);
        Ok(Value::Object(inner))
    }

    /// Body for /card/create
    pub fn create_body(&self) -> Result<Value, WechatError> {
        let mut card = Map::new();
        card.insert(
            "card_type".to_string(),
            Value::String(self.kind.card_type().to_string()),
        );
        card.insert(self.kind.nesting_key().to_string(), self.inner_object()?);
        Ok(json!({ "card": Value::Object(card) }))
    }

    /// Body for /card/update
    pub fn update_body(&self, card_id: &str) -> Result<Value, WechatError> {
        let mut body = Map::new();
        body.insert("card_id".to_string(), Value::String(card_id.to_string()));
        body.insert(self.kind.nesting_key().to_string(), self.inner_object()?);
        Ok(Value::Object(body))
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct CardCreateResponse {
    #[serde(default)]
    pub card_id: String,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeCardRef {
    #[serde(default)]
    pub card_id: String,
    #[serde(default)]
    pub begin_time: Option<u64>,
    #[serde(default)]
    pub end_time: Option<u64>,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct CodeConsumeResponse {
    #[serde(default)]
    pub card: Option<CodeCardRef>,
    #[serde(default)]
    pub openid: String,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct CodeGetResponse {
    #[serde(default)]
    pub card: Option<CodeCardRef>,
    #[serde(default)]
    pub openid: String,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Card/Coupon API
pub struct CardApi {
    context: Arc<WechatContext>,
}

impl CardApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    async fn token_path(&self, path: &str) -> Result<String, WechatError> {
        let access_token = self.context.token_manager.get_token().await?;
        Ok(WechatClient::append_access_token(path, &access_token))
    }

    /// Create a card, returning its card_id
    ///
    /// POST /card/create?access_token=TOKEN
    pub async fn create(&self, card: &CardPayload) -> Result<String, WechatError> {
        let path = self.token_path("/card/create").await?;
        let body = card.create_body()?;

        let response: CardCreateResponse = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response.card_id)
    }

    /// Update an existing card
    ///
    /// POST /card/update?access_token=TOKEN
    pub async fn update(&self, card_id: &str, card: &CardPayload) -> Result<(), WechatError> {
        let path = self.token_path("/card/update").await?;
        let body = card.update_body(card_id)?;

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Delete a card definition
    ///
    /// POST /card/delete?access_token=TOKEN
    ///
    /// Cards already claimed by users remain usable until they expire.
    pub async fn delete(&self, card_id: &str) -> Result<(), WechatError> {
        let path = self.token_path("/card/delete").await?;
        let body = json!({ "card_id": card_id });

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Consume (redeem) a user's card code
    ///
    /// POST /card/code/consume?access_token=TOKEN
    ///
    /// `card_id` is required only when the code is a custom one.
    pub async fn consume_code(
        &self,
        code: &str,
        card_id: Option<&str>,
    ) -> Result<CodeConsumeResponse, WechatError> {
        let path = self.token_path("/card/code/consume").await?;
        let mut body = Map::new();
        body.insert("code".to_string(), Value::String(code.to_string()));
        if let Some(card_id) = card_id {
            body.insert("card_id".to_string(), Value::String(card_id.to_string()));
        }

        let response: CodeConsumeResponse = self
            .context
            .client
            .post(&path, &Value::Object(body))
            .await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }

    /// Look up the state of a card code
    ///
    /// POST /card/code/get?access_token=TOKEN
    pub async fn code_get(
        &self,
        code: &str,
        card_id: Option<&str>,
    ) -> Result<CodeGetResponse, WechatError> {
        let path = self.token_path("/card/code/get").await?;
        let mut body = Map::new();
        body.insert("code".to_string(), Value::String(code.to_string()));
        if let Some(card_id) = card_id {
            body.insert("card_id".to_string(), Value::String(card_id.to_string()));
        }

        let response: CodeGetResponse = self
            .context
            .client
            .post(&path, &Value::Object(body))
            .await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }
}

impl WechatApi for CardApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "card"
    }
}
