use thiserror::Error;

/// WeChat SDK error types
#[derive(Debug, Error)]
pub enum WechatError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote API answered with a non-zero `errcode`. The code and
    /// message are passed through verbatim; callers key on the numeric
    /// code (e.g. 40013 invalid appid, 40099 code already consumed).
    #[error("WeChat API error (code={code}): {message}")]
    Api { code: i32, message: String },

    #[error("Access token error: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl WechatError {
    /// Classify a decoded response by its `errcode`/`errmsg` pair.
    ///
    /// `errcode == 0` means success; anything else becomes
    /// [`WechatError::Api`]. Responses without an `errcode` field
    /// deserialize to 0 via `#[serde(default)]` and count as success too.
    pub fn check_api(errcode: i32, errmsg: &str) -> Result<(), WechatError> {
        if errcode != 0 {
            return Err(WechatError::Api {
                code: errcode,
                message: errmsg.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_api_zero_is_success() {
        assert!(WechatError::check_api(0, "ok").is_ok());
    }

    #[test]
    fn test_check_api_nonzero_is_error() {
        let err = WechatError::check_api(40013, "invalid appid").unwrap_err();
        match err {
            WechatError::Api { code, message } => {
                assert_eq!(code, 40013);
                assert_eq!(message, "invalid appid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_api_negative_code_is_error() {
        assert!(WechatError::check_api(-1, "system error").is_err());
    }
}
