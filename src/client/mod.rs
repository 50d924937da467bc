//! WeChat HTTP Client module
//!
//! This module contains the WechatClient and related types.

mod wechat_client;
pub use wechat_client::{WechatClient, WechatClientBuilder};

mod wechat_pub;
pub use wechat_pub::WechatPub;

mod builder;
pub use builder::WechatPubBuilder;
