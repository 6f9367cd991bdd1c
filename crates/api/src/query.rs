//! Shared query parameter types for API handlers.
//!
//! The management listing parses its raw pairs with
//! `ManagementQuery::from_pairs`; the structs here cover the simple flags and
//! accept the same boolean spellings.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use stainmanager_core::query::parse_bool;

/// `?includeInactive=` for single-entity lookups (default `false`).
#[derive(Debug, Default, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default, alias = "includeInactive", deserialize_with = "bool_flag")]
    pub include_inactive: bool,
}

/// `?isActive=` for the unpaginated listing (default `true`).
#[derive(Debug, Deserialize)]
pub struct IsActiveParams {
    #[serde(
        default = "default_is_active",
        alias = "isActive",
        deserialize_with = "bool_flag"
    )]
    pub is_active: bool,
}

impl Default for IsActiveParams {
    fn default() -> Self {
        Self {
            is_active: default_is_active(),
        }
    }
}

fn default_is_active() -> bool {
    true
}

fn bool_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_bool(&raw).ok_or_else(|| de::Error::custom(format!("'{raw}' is not a boolean")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_active(json: &str) -> Result<bool, serde_json::Error> {
        serde_json::from_str::<IsActiveParams>(json).map(|p| p.is_active)
    }

    #[test]
    fn flags_accept_listing_spellings() {
        assert!(is_active("{}").unwrap());
        assert!(!is_active(r#"{"isActive":"0"}"#).unwrap());
        assert!(!is_active(r#"{"is_active":"FALSE"}"#).unwrap());
        assert!(is_active(r#"{"isActive":"1"}"#).unwrap());
    }

    #[test]
    fn flags_reject_other_words() {
        assert!(is_active(r#"{"isActive":"maybe"}"#).is_err());
    }
}
