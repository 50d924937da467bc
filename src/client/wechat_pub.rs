//! Unified WeChat Official Account SDK client

use std::path::Path;
use std::sync::Arc;

use crate::api::card::{
    CardApi, CardPayload, CodeConsumeResponse, CodeGetResponse,
};
use crate::api::datacube::{
    ArticleSummaryItem, DatacubeApi, DateRange, InterfaceSummaryItem, UserCumulateItem,
    UserSummaryItem,
};
use crate::api::group::{Group, GroupApi};
use crate::api::jssdk::{JsapiSignPackage, JsapiTicketResponse, JssdkApi};
use crate::api::material::{
    MaterialAddResponse, MaterialApi, MaterialBatchResponse, MaterialContent,
    MaterialCountResponse, PermanentArticle, VideoDescription,
};
use crate::api::media::{MediaApi, MediaType, MediaUploadResponse};
use crate::api::menu::{Menu, MenuApi, MenuResponse};
use crate::api::message::{CustomMessage, MessageApi};
use crate::api::pay::{DeliverNotify, OrderQueryResponse, PayApi, PayConfig};
use crate::api::poi::{PoiApi, PoiBaseInfo, PoiListResponse, PoiUpdate};
use crate::api::qrcode::{QrcodeApi, QrcodeTicket};
use crate::api::shorturl::ShortUrlApi;
use crate::api::user::{FollowerList, UserApi, UserInfo};
use crate::api::WechatContext;
use crate::error::WechatError;
use crate::types::AppId;

/// Unified WeChat Official Account client
///
/// This is the main entry point for the SDK. It provides access to all
/// Official Account APIs through a unified interface.
///
/// # Example
///
/// ```rust,ignore
/// use wechat_pub_sdk::WechatPub;
/// use wechat_pub_sdk::types::{AppId, AppSecret};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let wechat = WechatPub::builder()
///         .appid(AppId::new("wx1234567890abcdef")?)
///         .secret(AppSecret::new("your_secret")?)
///         .build()?;
///
///     let user = wechat.get_user_info("OPENID", "zh_CN").await?;
///     println!("Nickname: {}", user.nickname);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct WechatPub {
    context: Arc<WechatContext>,
    appid: AppId,
    pay_config: PayConfig,
}

impl WechatPub {
    pub fn builder() -> super::builder::WechatPubBuilder {
        super::builder::WechatPubBuilder::default()
    }

    pub(crate) fn new(context: Arc<WechatContext>, appid: AppId, pay_config: PayConfig) -> Self {
        Self {
            context,
            appid,
            pay_config,
        }
    }

    pub fn appid(&self) -> &str {
        self.appid.as_str()
    }

    pub async fn get_access_token(&self) -> Result<String, WechatError> {
        self.context.token_manager.get_token().await
    }

    pub async fn invalidate_token(&self) {
        self.context.token_manager.invalidate().await;
    }

    // Menu API

    pub async fn create_menu(&self, menu: &Menu) -> Result<(), WechatError> {
        MenuApi::new(self.context.clone()).create(menu).await
    }

    pub async fn get_menu(&self) -> Result<MenuResponse, WechatError> {
        MenuApi::new(self.context.clone()).get().await
    }

    pub async fn delete_menu(&self) -> Result<(), WechatError> {
        MenuApi::new(self.context.clone()).delete().await
    }

    // User API

    pub async fn get_user_info(&self, openid: &str, lang: &str) -> Result<UserInfo, WechatError> {
        UserApi::new(self.context.clone())
            .get_user_info(openid, lang)
            .await
    }

    pub async fn get_followers(
        &self,
        next_openid: Option<&str>,
    ) -> Result<FollowerList, WechatError> {
        UserApi::new(self.context.clone())
            .get_followers(next_openid)
            .await
    }

    pub async fn update_user_remark(
        &self,
        openid: &str,
        remark: &str,
    ) -> Result<(), WechatError> {
        UserApi::new(self.context.clone())
            .update_remark(openid, remark)
            .await
    }

    // Group API

    pub async fn create_group(&self, name: &str) -> Result<Group, WechatError> {
        GroupApi::new(self.context.clone()).create(name).await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, WechatError> {
        GroupApi::new(self.context.clone()).list().await
    }

    pub async fn move_user_to_group(
        &self,
        openid: &str,
        to_groupid: i64,
    ) -> Result<(), WechatError> {
        GroupApi::new(self.context.clone())
            .move_member(openid, to_groupid)
            .await
    }

    // Media API

    pub async fn upload_media(
        &self,
        media_type: MediaType,
        file_path: &Path,
    ) -> Result<MediaUploadResponse, WechatError> {
        MediaApi::new(self.context.clone())
            .upload(media_type, file_path)
            .await
    }

    pub async fn download_media(&self, media_id: &str) -> Result<Vec<u8>, WechatError> {
        MediaApi::new(self.context.clone()).download(media_id).await
    }

    // Material API

    pub async fn add_permanent_news(
        &self,
        articles: &[PermanentArticle],
    ) -> Result<String, WechatError> {
        MaterialApi::new(self.context.clone()).add_news(articles).await
    }

    pub async fn upload_permanent_material(
        &self,
        media_type: MediaType,
        file_path: &Path,
        description: Option<&VideoDescription>,
    ) -> Result<MaterialAddResponse, WechatError> {
        MaterialApi::new(self.context.clone())
            .add_material(media_type, file_path, description)
            .await
    }

    pub async fn download_permanent_material(
        &self,
        media_id: &str,
    ) -> Result<MaterialContent, WechatError> {
        MaterialApi::new(self.context.clone())
            .get_material(media_id)
            .await
    }

    pub async fn delete_permanent_material(&self, media_id: &str) -> Result<(), WechatError> {
        MaterialApi::new(self.context.clone())
            .del_material(media_id)
            .await
    }

    pub async fn get_material_count(&self) -> Result<MaterialCountResponse, WechatError> {
        MaterialApi::new(self.context.clone())
            .get_material_count()
            .await
    }

    pub async fn batch_get_material(
        &self,
        media_type: MediaType,
        offset: u32,
        count: u32,
    ) -> Result<MaterialBatchResponse, WechatError> {
        MaterialApi::new(self.context.clone())
            .batch_get_material(media_type, offset, count)
            .await
    }

    // Message API

    pub async fn send_custom_message(
        &self,
        touser: &str,
        message: &CustomMessage,
    ) -> Result<(), WechatError> {
        MessageApi::new(self.context.clone())
            .send(touser, message)
            .await
    }

    // QR Code API

    pub async fn create_temporary_qrcode(
        &self,
        scene_id: u32,
        expire_seconds: u32,
    ) -> Result<QrcodeTicket, WechatError> {
        QrcodeApi::new(self.context.clone())
            .create_temporary(scene_id, expire_seconds)
            .await
    }

    pub async fn create_permanent_qrcode(
        &self,
        scene_id: u32,
    ) -> Result<QrcodeTicket, WechatError> {
        QrcodeApi::new(self.context.clone())
            .create_permanent(scene_id)
            .await
    }

    // Short URL API

    pub async fn long2short(&self, long_url: &str) -> Result<String, WechatError> {
        ShortUrlApi::new(self.context.clone())
            .long2short(long_url)
            .await
    }

    // JS-SDK API

    pub async fn get_jsapi_ticket(&self) -> Result<JsapiTicketResponse, WechatError> {
        JssdkApi::new(self.context.clone()).get_jsapi_ticket().await
    }

    pub async fn sign_jsapi_url(&self, url: &str) -> Result<JsapiSignPackage, WechatError> {
        JssdkApi::new(self.context.clone()).sign_url(url).await
    }

    // Pay API

    pub async fn pay_deliver_notify(&self, notify: &DeliverNotify) -> Result<(), WechatError> {
        PayApi::new(self.context.clone(), self.pay_config.clone())
            .deliver_notify(notify)
            .await
    }

    pub async fn pay_order_query(
        &self,
        out_trade_no: &str,
    ) -> Result<OrderQueryResponse, WechatError> {
        PayApi::new(self.context.clone(), self.pay_config.clone())
            .order_query(out_trade_no)
            .await
    }

    // Card API

    pub async fn create_card(&self, card: &CardPayload) -> Result<String, WechatError> {
        CardApi::new(self.context.clone()).create(card).await
    }

    pub async fn delete_card(&self, card_id: &str) -> Result<(), WechatError> {
        CardApi::new(self.context.clone()).delete(card_id).await
    }

    pub async fn consume_card_code(
        &self,
        code: &str,
        card_id: Option<&str>,
    ) -> Result<CodeConsumeResponse, WechatError> {
        CardApi::new(self.context.clone())
            .consume_code(code, card_id)
            .await
    }

    pub async fn get_card_code(
        &self,
        code: &str,
        card_id: Option<&str>,
    ) -> Result<CodeGetResponse, WechatError> {
        CardApi::new(self.context.clone())
            .code_get(code, card_id)
            .await
    }

    // POI API

    pub async fn add_poi(&self, poi: &PoiBaseInfo) -> Result<(), WechatError> {
        PoiApi::new(self.context.clone()).add(poi).await
    }

    pub async fn get_poi(&self, poi_id: &str) -> Result<PoiBaseInfo, WechatError> {
        PoiApi::new(self.context.clone()).get(poi_id).await
    }

    pub async fn list_pois(&self, begin: u32, limit: u32) -> Result<PoiListResponse, WechatError> {
        PoiApi::new(self.context.clone()).list(begin, limit).await
    }

    pub async fn update_poi(&self, update: &PoiUpdate) -> Result<(), WechatError> {
        PoiApi::new(self.context.clone()).update(update).await
    }

    pub async fn delete_poi(&self, poi_id: &str) -> Result<(), WechatError> {
        PoiApi::new(self.context.clone()).delete(poi_id).await
    }

    // Datacube API

    pub async fn get_user_summary(
        &self,
        range: &DateRange,
    ) -> Result<Vec<UserSummaryItem>, WechatError> {
        DatacubeApi::new(self.context.clone())
            .get_user_summary(range)
            .await
    }

    pub async fn get_user_cumulate(
        &self,
        range: &DateRange,
    ) -> Result<Vec<UserCumulateItem>, WechatError> {
        DatacubeApi::new(self.context.clone())
            .get_user_cumulate(range)
            .await
    }

    pub async fn get_article_summary(
        &self,
        range: &DateRange,
    ) -> Result<Vec<ArticleSummaryItem>, WechatError> {
        DatacubeApi::new(self.context.clone())
            .get_article_summary(range)
            .await
    }

    pub async fn get_interface_summary(
        &self,
        range: &DateRange,
    ) -> Result<Vec<InterfaceSummaryItem>, WechatError> {
        DatacubeApi::new(self.context.clone())
            .get_interface_summary(range)
            .await
    }

    /// Per-namespace API handles, for calls the convenience methods do
    /// not cover.
    pub fn pay_api(&self) -> PayApi {
        PayApi::new(self.context.clone(), self.pay_config.clone())
    }

    pub fn card_api(&self) -> CardApi {
        CardApi::new(self.context.clone())
    }

    pub fn jssdk_api(&self) -> JssdkApi {
        JssdkApi::new(self.context.clone())
    }
}

impl std::fmt::Debug for WechatPub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatPub")
            .field("appid", &self.appid)
            .finish_non_exhaustive()
    }
}
