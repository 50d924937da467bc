//! Middleware components for the SDK.
//!
//! Tower-based middleware slotted between the typed client and the
//! underlying HTTP transport. Compose with `ServiceBuilder` and hand
//! the result to the builder's `with_middleware`.
//!
//! ```ignore
//! use wechat_pub_sdk::middleware::LoggingMiddleware;
//!
//! let wechat = WechatPub::builder()
//!     .appid(appid)
//!     .secret(secret)
//!     .with_middleware(LoggingMiddleware::new())
//!     .build()?;
//! ```

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};

mod logging;

pub use logging::LoggingMiddleware;
