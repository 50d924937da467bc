//! WeChat Official Account SDK for Rust
//!
//! A Rust SDK for the WeChat Official Account (公众号) server-side APIs:
//! custom menus, followers and groups, customer service messages,
//! temporary media and permanent materials, scene QR codes, short URLs,
//! the JS-SDK signing flow, the legacy in-chat payment signing flow,
//! card/coupon management, store (POI) listings and analytics.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wechat_pub_sdk::{WechatPub, types::{AppId, AppSecret}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wechat = WechatPub::builder()
//!         .appid(AppId::new("wx1234567890abcdef")?)
//!         .secret(AppSecret::new("your_secret")?)
//!         .build()?;
//!
//!     let user = wechat.get_user_info("OPENID", "zh_CN").await?;
//!     println!("Nickname: {}", user.nickname);
//!
//!     let package = wechat.sign_jsapi_url("https://example.com/shop").await?;
//!     println!("Signature: {}", package.signature);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Official Account API modules (menu, user, media, pay, card, ...)
//! - [`client`] - HTTP client and the [`WechatPub`] facade
//! - [`sign`] - Parameter canonicalization and signing recipes
//! - [`error`] - Error types
//! - [`middleware`] - Tower middleware (logging)
//! - [`token`] - Access token management (internal, for advanced users)
//! - [`types`] - Validated identifier types
//!
//! ## Error Handling
//!
//! The SDK uses the [`WechatError`] enum for error handling. A response
//! whose `errcode` is `0` or absent is a success; any other value maps
//! to [`WechatError::Api`]:
//!
//! ```rust,ignore
//! use wechat_pub_sdk::WechatError;
//!
//! match result {
//!     Ok(response) => { /* handle success */ }
//!     Err(WechatError::Api { code, message }) => {
//!         eprintln!("API error: {} - {}", code, message);
//!     }
//!     Err(e) => eprintln!("Transport error: {}", e),
//! }
//! ```
//!
//! ## Token Management
//!
//! Access tokens are fetched lazily, cached until shortly before
//! expiry and refreshed under a lock so concurrent callers trigger a
//! single refresh. Failed API calls are never retried by the SDK.

pub mod api;
pub mod client;
pub mod error;
pub mod middleware;
pub mod sign;
pub mod token;
pub mod types;

pub use client::{WechatClient, WechatClientBuilder, WechatPub, WechatPubBuilder};
pub use error::WechatError;
pub use sign::{HashAlgorithm, SigningRecipe};
