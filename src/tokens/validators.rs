//! Token validators: predicates deciding whether a candidate string is
//! well-formed for a key, plus builders for the common formats.

use std::rc::Rc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::settings::TokenFormat;
use crate::helpers::time::now_i64;

/// Stored per key; shared so it can be called without holding the registry borrow.
pub type Validator = Rc<dyn Fn(&str) -> bool>;

pub fn any() -> Validator {
    Rc::new(|_: &str| true)
}

pub fn non_empty() -> Validator {
    Rc::new(|token: &str| !token.trim().is_empty())
}

pub fn prefix(prefix: impl Into<String>) -> Validator {
    let prefix = prefix.into();
    Rc::new(move |token: &str| token.len() > prefix.len() && token.starts_with(prefix.as_str()))
}

/// Whole-token match: the pattern is anchored on both ends.
///
/// The pattern must compile on its own first, so an unbalanced group such as
/// `a)|(?:b` cannot close the anchoring group and escape it.
pub fn pattern(pattern: &str) -> Result<Validator, regex::Error> {
    Regex::new(pattern)?;
    let re = Regex::new(&format!("^(?:{})$", pattern))?;
    Ok(Rc::new(move |token: &str| re.is_match(token)))
}

pub fn jwt(require_unexpired: bool) -> Validator {
    Rc::new(move |token: &str| match decode_jwt(token) {
        Some(claims) if require_unexpired => claims.exp.is_some_and(|exp| exp > now_i64() as f64),
        Some(_) => true,
        None => false,
    })
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JwtClaims {
    /// NumericDate: seconds since the epoch, fractions allowed.
    pub exp: Option<f64>,
}

/// Decode the claims of a `header.payload.signature` token without verifying
/// the signature. `None` if the shape or either JSON segment is wrong.
pub fn decode_jwt(token: &str) -> Option<JwtClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let header = decode_json_segment(parts[0])?;
    if !header.is_object() {
        return None;
    }
    if !parts[2].is_empty() && URL_SAFE_NO_PAD.decode(parts[2]).is_err() {
        return None;
    }

    let payload = decode_json_segment(parts[1])?;
    serde_json::from_value::<JwtClaims>(payload)
        .inspect_err(|e| debug!("invalid JWT payload: {}", e))
        .ok()
}

fn decode_json_segment(segment: &str) -> Option<Value> {
    let decoded = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<Value>(&decoded).ok()
}

impl TokenFormat {
    /// Build the validator; only `Pattern` can fail.
    pub fn validator(&self) -> Result<Validator, regex::Error> {
        Ok(match self {
            TokenFormat::Any => any(),
            TokenFormat::NonEmpty => non_empty(),
            TokenFormat::Prefix { prefix: p } => prefix(p.as_str()),
            TokenFormat::Pattern { pattern: p } => pattern(p)?,
            TokenFormat::Jwt { require_unexpired } => jwt(*require_unexpired),
        })
    }
}
