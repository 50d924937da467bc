//! WeChat Official Account API modules
//!
//! This module contains submodules for the Official Account APIs:
//!
//! - [`menu`] - Custom menu management
//! - [`user`] - Follower profiles and follower list
//! - [`group`] - Follower grouping
//! - [`media`] - Temporary media upload and download
//! - [`material`] - Permanent material and news management
//! - [`message`] - Customer service messages
//! - [`qrcode`] - Scene QR codes
//! - [`shorturl`] - Long-to-short URL conversion
//! - [`jssdk`] - JS-SDK ticket and URL signing
//! - [`pay`] - Payment package signing, deliver notify, order query
//! - [`card`] - Card/coupon definitions and code redemption
//! - [`poi`] - Physical store listings
//! - [`datacube`] - User, article and interface analytics
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wechat_pub_sdk::{WechatPub, types::{AppId, AppSecret}};
//! ```

pub mod card;
pub mod datacube;
pub mod group;
pub mod jssdk;
pub mod material;
pub mod media;
pub mod menu;
pub mod message;
pub mod pay;
pub mod poi;
pub mod qrcode;
pub mod shorturl;
pub mod r#trait;
pub mod user;

pub use card::{
    BaseInfo, CardApi, CardCreateResponse, CardKind, CardPayload, CodeCardRef,
    CodeConsumeResponse, CodeGetResponse, CodeType, DateInfo, Sku,
};
pub use datacube::{
    ArticleSummaryItem, DatacubeApi, DateRange, InterfaceSummaryItem, UserCumulateItem,
    UserSummaryItem,
};
pub use group::{Group, GroupApi};
pub use jssdk::{JsapiSignPackage, JsapiTicketResponse, JssdkApi};
pub use material::{
    MaterialAddResponse, MaterialApi, MaterialBatchResponse, MaterialContent,
    MaterialCountResponse, PermanentArticle, VideoDescription,
};
pub use media::{MediaApi, MediaType, MediaUploadResponse};
pub use menu::{Menu, MenuApi, MenuButton, MenuResponse};
pub use message::{CustomMessage, MessageApi, NewsArticle};
pub use pay::{
    DeliverNotify, OrderInfo, OrderQueryResponse, PayApi, PayConfig,
};
pub use poi::{PoiApi, PoiBaseInfo, PoiListResponse, PoiPhoto, PoiUpdate};
pub use qrcode::{QrcodeApi, QrcodeTicket};
pub use shorturl::{ShortUrlApi, ShortUrlResponse};
pub use r#trait::{WechatApi, WechatContext};
pub use user::{FollowerList, UserApi, UserInfo};
