//! WeChat HTTP client
//!
//! Shared transport for all Official Account API calls: query-string GET
//! and DELETE, JSON / form-encoded / multipart POST, binary downloads,
//! and the errcode-to-error mapping every JSON response goes through.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

use crate::error::WechatError;
use crate::types::{AppId, AppSecret};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.weixin.qq.com";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
type MiddlewareExecutor = Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// WeChat API client
///
/// Reusable HTTP client for calling the Official Account APIs.
/// Built with reqwest for async HTTP requests. TLS certificate
/// verification is always on; timeouts are configurable per builder.
#[derive(Clone)]
pub struct WechatClient {
    http: Client,
    appid: AppId,
    secret: AppSecret,
    base_url: String,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for WechatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatClient")
            .field("appid", &self.appid)
            .field("base_url", &self.base_url)
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl WechatClient {
    /// Create a new client builder
    pub fn builder() -> WechatClientBuilder {
        WechatClientBuilder::default()
    }

    /// Get the appid
    pub fn appid(&self) -> &str {
        self.appid.as_str()
    }

    /// Get the app secret
    pub(crate) fn secret(&self) -> &str {
        self.secret.as_str()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append a percent-encoded access_token to an endpoint path.
    pub(crate) fn append_access_token(path: &str, access_token: &str) -> String {
        let encoded = utf8_percent_encode(access_token, NON_ALPHANUMERIC);
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}access_token={encoded}")
    }

    /// Returns the underlying [`reqwest::Client`] for raw HTTP requests.
    ///
    /// Note: requests made through this client bypass the middleware
    /// pipeline. Use the typed methods for middleware-aware requests.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    /// Send a built request and decode the JSON body, mapping a non-zero
    /// `errcode` to [`WechatError::Api`]. A response without an `errcode`
    /// key is success (absence is equivalent to zero).
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<T, WechatError> {
        let response = self.send_request(request).await?;

        if let Err(e) = response.error_for_status_ref() {
            return Err(e.into());
        }

        let value: Value = response.json().await?;

        if let Some(errcode) = value.get("errcode").and_then(|v| v.as_i64()) {
            if errcode != 0 {
                let errmsg = value
                    .get("errmsg")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown error");
                return Err(WechatError::Api {
                    code: errcode.try_into().unwrap_or(i32::MAX),
                    message: errmsg.to_string(),
                });
            }
        }

        serde_json::from_value(value).map_err(WechatError::Json)
    }

    /// Make a GET request
    ///
    /// # Arguments
    /// * `path` - API endpoint path (e.g., "/cgi-bin/token")
    /// * `query` - Query parameters as key-value pairs
    ///
    /// # Errors
    /// - `WechatError::Http` for network failures or non-2xx status codes
    /// - `WechatError::Api` when the API returns errcode != 0
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WechatError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.get(url).query(query).build()?;
        self.execute(request).await
    }

    /// Make a GET request and return the raw response.
    ///
    /// Used for binary media downloads where the body is not JSON and the
    /// caller needs access to `Content-Type`/`Content-Disposition`.
    pub async fn get_raw(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, WechatError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.get(url).query(query).build()?;
        let response = self.send_request(request).await?;
        if let Err(e) = response.error_for_status_ref() {
            return Err(e.into());
        }
        Ok(response)
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, WechatError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.post(url).json(body).build()?;
        self.execute(request).await
    }

    /// Make a POST request with a JSON body and return the raw response.
    ///
    /// Used where the endpoint answers with file bytes for some inputs
    /// and a JSON document for others (permanent material download).
    pub async fn post_raw<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, WechatError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.post(url).json(body).build()?;
        let response = self.send_request(request).await?;
        if let Err(e) = response.error_for_status_ref() {
            return Err(e.into());
        }
        Ok(response)
    }

    /// Make a POST request with a form-urlencoded body
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, WechatError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.post(url).form(params).build()?;
        self.execute(request).await
    }

    /// Make a POST request with a multipart/form-data body.
    ///
    /// See [`multipart_form`] for how `params` is interpreted. reqwest
    /// generates a fresh random boundary for every form.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &Map<String, Value>,
    ) -> Result<T, WechatError> {
        let url = format!("{}{}", self.base_url, path);
        let form = multipart_form(params).await?;
        let request = self.http.post(url).multipart(form).build()?;
        self.execute(request).await
    }

    /// Make a DELETE request; parameters ride on the query string,
    /// mirroring GET framing.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WechatError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.delete(url).query(query).build()?;
        self.execute(request).await
    }
}

/// Build a multipart form from a parameter map.
///
/// A string value prefixed with `@` names a local file whose contents are
/// read and embedded as a file part under the basename of the path; all
/// other scalar values become plain fields. Nested values are rejected
/// before any I/O happens.
pub async fn multipart_form(params: &Map<String, Value>) -> Result<Form, WechatError> {
    let mut form = Form::new();

    for (key, value) in params {
        match value {
            Value::String(s) if s.starts_with('@') => {
                let file_path = s.trim_start_matches('@');
                let content = tokio::fs::read(file_path).await?;
                let filename = Path::new(file_path)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.split('?').next().unwrap_or(n).to_string())
                    .unwrap_or_else(|| "upload".to_string());
                let part = Part::bytes(content).file_name(filename);
                form = form.part(key.clone(), part);
            }
            Value::String(s) => {
                form = form.text(key.clone(), s.clone());
            }
            Value::Number(n) => {
                form = form.text(key.clone(), n.to_string());
            }
            Value::Bool(b) => {
                form = form.text(key.clone(), b.to_string());
            }
            Value::Null => {}
            Value::Array(_) | Value::Object(_) => {
                return Err(WechatError::InvalidArgument(format!(
                    "multipart parameter '{}' is a nested value",
                    key
                )));
            }
        }
    }

    Ok(form)
}

impl Service<reqwest::Request> for WechatClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}

/// Builder for WechatClient
///
/// # Example
///
/// ```rust
/// use wechat_pub_sdk::client::WechatClient;
/// use wechat_pub_sdk::types::{AppId, AppSecret};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let appid = AppId::new("wx1234567890abcdef")?;
/// let secret = AppSecret::new("abc1234567890abcdef")?;
///
/// let client = WechatClient::builder()
///     .appid(appid)
///     .secret(secret)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct WechatClientBuilder {
    appid: Option<AppId>,
    secret: Option<AppSecret>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl WechatClientBuilder {
    /// Set the AppID
    pub fn appid(mut self, appid: AppId) -> Self {
        self.appid = Some(appid);
        self
    }

    /// Set the AppSecret
    pub fn secret(mut self, secret: AppSecret) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Set the base URL for API calls
    ///
    /// Default: `<https://api.weixin.qq.com>`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the total timeout for requests
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    ///
    /// Default: 10 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the WechatClient
    ///
    /// # Errors
    /// Returns an error if appid or secret is not set
    pub fn build(self) -> Result<WechatClient, WechatError> {
        let appid = self
            .appid
            .ok_or_else(|| WechatError::Config("appid is required".to_string()))?;
        let secret = self
            .secret
            .ok_or_else(|| WechatError::Config("secret is required".to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(WechatClient {
            http: client,
            appid,
            secret,
            base_url,
            middleware_executor: None,
        })
    }
}
