use serde::Deserialize;

/// Minimal response shape shared by endpoints that only return
/// `errcode`/`errmsg` (e.g. menu create, message send).
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponseBase {
    #[serde(default)]
    pub errcode: i32,
    #[serde(default)]
    pub errmsg: String,
}

impl ApiResponseBase {
    pub fn is_success(&self) -> bool {
        self.errcode == 0
    }
}
