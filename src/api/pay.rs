//! Payment API
//!
//! Deliver-notify and order-query calls plus the two signing artifacts
//! they require:
//!
//! - `package` — the order parameters canonicalized, signed with the
//!   partner key (MD5, uppercase), then re-joined with percent-encoded
//!   values and `&sign=...` appended;
//! - `app_signature` — SHA-1 over the canonicalized parameters with the
//!   pay sign key included as `appkey`.
//!
//! All three keys (`pay_sign_key`, `partner_id`, `partner_key`) are
//! optional at construction and only checked when a payment call needs
//! them.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::client::WechatClient;
use crate::error::WechatError;
use crate::sign::{canonicalize, canonicalize_urlencoded, sign, SigningRecipe};
use crate::types::ApiResponseBase;

use super::r#trait::{WechatApi, WechatContext};

/// Merchant-side payment credentials.
#[derive(Debug, Clone, Default)]
pub struct PayConfig {
    /// Key for `app_signature` generation (appkey in the signed set)
    pub pay_sign_key: Option<String>,
    /// Tenpay merchant identifier (partner)
    pub partner_id: Option<String>,
    /// Tenpay merchant key, used for the package sign
    pub partner_key: Option<String>,
}

/// Shipping notification input for deliver-notify.
#[derive(Debug, Clone)]
pub struct DeliverNotify {
    pub openid: String,
    pub transid: String,
    pub out_trade_no: String,
    /// Unix timestamp of shipment
    pub deliver_timestamp: u64,
    /// 1 shipped, 0 failed (reason goes in `deliver_msg`)
    pub deliver_status: u8,
    pub deliver_msg: String,
}

/// Detailed order state from order-query.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInfo {
    #[serde(default)]
    pub ret_code: i32,
    #[serde(default)]
    pub ret_msg: String,
    #[serde(default)]
    pub trade_state: String,
    #[serde(default)]
    pub partner: String,
    #[serde(default)]
    pub bank_type: String,
    #[serde(default)]
    pub total_fee: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub time_end: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct OrderQueryResponse {
    #[serde(default)]
    pub order_info: Option<OrderInfo>,
    #[serde(default)]
    pub(crate) errcode: i32,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Payment API
pub struct PayApi {
    context: Arc<WechatContext>,
    config: PayConfig,
}

impl PayApi {
    pub fn new(context: Arc<WechatContext>, config: PayConfig) -> Self {
        Self { context, config }
    }

    fn pay_sign_key(&self) -> Result<&str, WechatError> {
        self.config
            .pay_sign_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WechatError::InvalidArgument("pay_sign_key is not configured".into()))
    }

    fn partner_id(&self) -> Result<&str, WechatError> {
        self.config
            .partner_id
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WechatError::InvalidArgument("partner_id is not configured".into()))
    }

    fn partner_key(&self) -> Result<&str, WechatError> {
        self.config
            .partner_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WechatError::InvalidArgument("partner_key is not configured".into()))
    }

    /// Build the `package` string for a set of order parameters.
    ///
    /// The sign is MD5 over the raw canonical string plus the partner
    /// key, uppercase; the payload around it uses percent-encoded
    /// values.
    pub fn build_package(&self, params: &Map<String, Value>) -> Result<String, WechatError> {
        let partner_key = self.partner_key()?;

        let canonical = canonicalize(params)?;
        let signature = sign(&canonical, partner_key, &SigningRecipe::payment_md5())?;
        let encoded = canonicalize_urlencoded(params)?;

        Ok(format!("{}&sign={}", encoded, signature))
    }

    /// Compute `app_signature` for a parameter set.
    ///
    /// Keys are lower-cased and the pay sign key joins the set as
    /// `appkey` before canonicalization; the hash is plain SHA-1.
    pub fn app_signature(&self, params: &Map<String, Value>) -> Result<String, WechatError> {
        let pay_sign_key = self.pay_sign_key()?;

        let mut signed: Map<String, Value> = params
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect();
        signed.insert(
            "appkey".to_string(),
            Value::String(pay_sign_key.to_string()),
        );

        let canonical = canonicalize(&signed)?;
        sign(&canonical, "", &SigningRecipe::jsapi_sha1())
    }

    /// Report shipment for a paid order
    ///
    /// POST /cgi-bin/pay/delivernotify?access_token=ACCESS_TOKEN
    ///
    /// Must be called after the payment notification arrives; skipping it
    /// affects merchant settlement.
    pub async fn deliver_notify(&self, notify: &DeliverNotify) -> Result<(), WechatError> {
        let appid = self.context.client.appid().to_string();

        let signed_params = json_map(json!({
            "appid": appid,
            "openid": notify.openid,
            "transid": notify.transid,
            "out_trade_no": notify.out_trade_no,
            "deliver_timestamp": notify.deliver_timestamp.to_string(),
            "deliver_status": notify.deliver_status.to_string(),
            "deliver_msg": notify.deliver_msg,
        }));
        let app_signature = self.app_signature(&signed_params)?;

        let body = json!({
            "appid": appid,
            "openid": notify.openid,
            "transid": notify.transid,
            "out_trade_no": notify.out_trade_no,
            "deliver_timestamp": notify.deliver_timestamp.to_string(),
            "deliver_status": notify.deliver_status.to_string(),
            "deliver_msg": notify.deliver_msg,
            "app_signature": app_signature,
            "sign_method": "sha1",
        });

        let access_token = self.context.token_manager.get_token().await?;
        let path =
            WechatClient::append_access_token("/cgi-bin/pay/delivernotify", &access_token);

        let response: ApiResponseBase = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(())
    }

    /// Query the payment state of an order
    ///
    /// POST /cgi-bin/pay/orderquery?access_token=ACCESS_TOKEN
    pub async fn order_query(&self, out_trade_no: &str) -> Result<OrderQueryResponse, WechatError> {
        let appid = self.context.client.appid().to_string();
        let partner = self.partner_id()?.to_string();

        let package = self.build_package(&json_map(json!({
            "out_trade_no": out_trade_no,
            "partner": partner,
        })))?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| WechatError::InvalidArgument(format!("system clock error: {e}")))?
            .as_secs();

        let signed_params = json_map(json!({
            "appid": appid,
            "package": package,
            "timestamp": timestamp.to_string(),
        }));
        let app_signature = self.app_signature(&signed_params)?;

        let body = json!({
            "appid": appid,
            "package": package,
            "timestamp": timestamp.to_string(),
            "app_signature": app_signature,
            "sign_method": "sha1",
        });

        let access_token = self.context.token_manager.get_token().await?;
        let path = WechatClient::append_access_token("/cgi-bin/pay/orderquery", &access_token);

        let response: OrderQueryResponse = self.context.client.post(&path, &body).await?;
        WechatError::check_api(response.errcode, &response.errmsg)?;
        Ok(response)
    }
}

impl WechatApi for PayApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "pay"
    }
}

fn json_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppId, AppSecret};
    use crate::WechatClient;

    fn create_test_context() -> Arc<WechatContext> {
        let appid = AppId::new("wx1234567890abcdef").unwrap();
        let secret = AppSecret::new("secret1234567890ab").unwrap();
        let client = Arc::new(
            WechatClient::builder()
                .appid(appid)
                .secret(secret)
                .build()
                .unwrap(),
        );
        let token_manager = Arc::new(crate::token::TokenManager::new((*client).clone()));
        Arc::new(WechatContext::new(client, token_manager))
    }

    fn pay_api(config: PayConfig) -> PayApi {
        PayApi::new(create_test_context(), config)
    }

    #[test]
    fn test_build_package_matches_documented_recipe() {
        let api = pay_api(PayConfig {
            partner_key: Some("xxxxxx".to_string()),
            ..Default::default()
        });
        let params = json_map(json!({
            "out_trade_no": "11122",
            "partner": "1900090055",
        }));
        let package = api.build_package(&params).unwrap();

        // sign = md5("out_trade_no=11122&partner=1900090055&key=xxxxxx").toupper
        assert_eq!(
            package,
            "out_trade_no=11122&partner=1900090055&sign=D13070BB352612D37D682E1D043798CB"
        );
    }

    #[test]
    fn test_build_package_without_partner_key() {
        let api = pay_api(PayConfig::default());
        let params = json_map(json!({"out_trade_no": "1"}));
        let err = api.build_package(&params).unwrap_err();
        assert!(matches!(err, WechatError::InvalidArgument(_)));
    }

    #[test]
    fn test_app_signature_lowercases_keys_and_injects_appkey() {
        let api = pay_api(PayConfig {
            pay_sign_key: Some("signkey".to_string()),
            ..Default::default()
        });
        let mixed = json_map(json!({"AppId": "wx1", "TransId": "t1"}));
        let lower = json_map(json!({"appid": "wx1", "transid": "t1"}));
        assert_eq!(
            api.app_signature(&mixed).unwrap(),
            api.app_signature(&lower).unwrap()
        );

        // appkey participates: changing the key changes the signature
        let other = pay_api(PayConfig {
            pay_sign_key: Some("otherkey".to_string()),
            ..Default::default()
        });
        assert_ne!(
            api.app_signature(&lower).unwrap(),
            other.app_signature(&lower).unwrap()
        );
    }

    #[test]
    fn test_app_signature_without_key() {
        let api = pay_api(PayConfig::default());
        let params = json_map(json!({"appid": "wx1"}));
        assert!(matches!(
            api.app_signature(&params),
            Err(WechatError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_order_info_parse() {
        let json = r#"{
            "errcode": 0,
            "errmsg": "ok",
            "order_info": {
                "ret_code": 0,
                "ret_msg": "",
                "trade_state": "0",
                "partner": "1900000109",
                "bank_type": "CMB_FP",
                "total_fee": "1",
                "transaction_id": "1900000109201307020305773741",
                "out_trade_no": "2986872580246457300",
                "time_end": "20130702175943"
            }
        }"#;
        let response: OrderQueryResponse = serde_json::from_str(json).unwrap();
        let info = response.order_info.unwrap();
        assert_eq!(info.trade_state, "0");
        assert_eq!(info.out_trade_no, "2986872580246457300");
    }
}
