use md5::Md5;
use sha1::{Digest, Sha1};

use crate::error::WechatError;

/// Hash algorithm used by a [`SigningRecipe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
}

/// How a canonical string is turned into a signature.
///
/// The payment `package` sign appends `&key=secret` before hashing and
/// upper-cases the hex digest; the JS-SDK/pay-sign recipe hashes the
/// canonical string verbatim (the secret is already among the
/// canonicalized parameters, e.g. as `appkey`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningRecipe {
    pub algorithm: HashAlgorithm,
    pub append_key: bool,
    pub upper_case: bool,
}

impl SigningRecipe {
    /// Payment-package recipe: `MD5(canonical + "&key=" + secret)`, uppercase.
    pub fn payment_md5() -> Self {
        Self {
            algorithm: HashAlgorithm::Md5,
            append_key: true,
            upper_case: true,
        }
    }

    /// JS-SDK / pay-sign recipe: `SHA1(canonical)`, lowercase.
    pub fn jsapi_sha1() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha1,
            append_key: false,
            upper_case: false,
        }
    }
}

/// Sign a canonical string with the given recipe.
///
/// Pure: identical inputs always yield the identical hex signature.
///
/// # Errors
/// Returns [`WechatError::InvalidArgument`] when the recipe appends the
/// key but no secret is configured.
pub fn sign(canonical: &str, secret: &str, recipe: &SigningRecipe) -> Result<String, WechatError> {
    let input = if recipe.append_key {
        if secret.trim().is_empty() {
            return Err(WechatError::InvalidArgument(
                "signing secret is not configured".to_string(),
            ));
        }
        format!("{}&key={}", canonical, secret)
    } else {
        canonical.to_string()
    };

    let digest = match recipe.algorithm {
        HashAlgorithm::Md5 => hex::encode(Md5::digest(input.as_bytes())),
        HashAlgorithm::Sha1 => hex::encode(Sha1::digest(input.as_bytes())),
    };

    if recipe.upper_case {
        Ok(digest.to_uppercase())
    } else {
        Ok(digest)
    }
}
