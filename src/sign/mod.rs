//! Canonical parameter serialization and signing
//!
//! The payment `package`/`app_signature` and the JS-SDK `wx.config`
//! signature share one canonicalization: drop empty values and reserved
//! keys, sort keys byte-wise, join as `key=value&...`. Only the hash
//! recipe applied on top differs, so the recipe is a parameter here
//! instead of being duplicated per call site.

mod canonical;
mod signer;

pub use canonical::{canonicalize, canonicalize_urlencoded};
pub use signer::{sign, HashAlgorithm, SigningRecipe};
