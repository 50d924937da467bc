//! Type definitions for WeChat Official Account API entities

mod ids;
mod response;

pub use ids::{AccessToken, AppId, AppSecret, OpenId};
pub use response::ApiResponseBase;
