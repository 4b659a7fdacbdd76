//! Quantity Rules
//!
//! `qty` arrives as an arbitrary string. It is parsed leniently (leading
//! integer, anything else falls back to 1) and then run through the per-SKU
//! policy: bundle SKUs already encode their unit count and are pinned.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// What quantity a SKU is sold in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityRule {
    /// Whatever the caller asked for
    #[default]
    Requested,

    /// Always this many, regardless of `qty`
    Fixed(u32),
}

/// Per-SKU quantity rules; SKUs without an entry use [`QuantityRule::Requested`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantityPolicy {
    rules: HashMap<String, QuantityRule>,
}

impl QuantityPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rule(mut self, sku: impl Into<String>, rule: QuantityRule) -> Self {
        self.rules.insert(sku.into(), rule);
        self
    }

    pub fn rule(&self, sku: &str) -> QuantityRule {
        self.rules.get(sku).copied().unwrap_or_default()
    }

    /// Quantity to put in the cart for `sku` given the raw `qty` parameter
    pub fn effective(&self, sku: &str, raw_qty: Option<&str>) -> u32 {
        match self.rule(sku) {
            QuantityRule::Fixed(n) => n.max(1),
            QuantityRule::Requested => parse_quantity(raw_qty),
        }
    }
}

/// Parse a `qty` parameter.
///
/// Takes the leading integer (`"3"`, `" 3"`, `"3abc"`, `"3.9"` all give 3),
/// falls back to 1 when there is none and never returns less than 1.
pub fn parse_quantity(raw: Option<&str>) -> u32 {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return 1;
    };

    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if digits.is_empty() || negative {
        return 1;
    }

    // Digits only at this point, so the sole failure mode is overflow
    digits.parse::<u32>().unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_one() {
        assert_eq!(parse_quantity(None), 1);
        assert_eq!(parse_quantity(Some("")), 1);
        assert_eq!(parse_quantity(Some("abc")), 1);
        assert_eq!(parse_quantity(Some("  ")), 1);
        assert_eq!(parse_quantity(Some("-")), 1);
    }

    #[test]
    fn test_parse_floors_at_one() {
        assert_eq!(parse_quantity(Some("0")), 1);
        assert_eq!(parse_quantity(Some("-4")), 1);
        assert_eq!(parse_quantity(Some("-0")), 1);
    }

    #[test]
    fn test_parse_leading_integer() {
        assert_eq!(parse_quantity(Some("3")), 3);
        assert_eq!(parse_quantity(Some(" 7")), 7);
        assert_eq!(parse_quantity(Some("+2")), 2);
        assert_eq!(parse_quantity(Some("4bags")), 4);
        assert_eq!(parse_quantity(Some("2.9")), 2);
    }

    #[test]
    fn test_parse_saturates() {
        assert_eq!(parse_quantity(Some("99999999999999999999")), u32::MAX);
    }

    #[test]
    fn test_fixed_rule_ignores_request() {
        let policy = QuantityPolicy::new().with_rule("BUNDLE", QuantityRule::Fixed(1));
        assert_eq!(policy.effective("BUNDLE", Some("5")), 1);
        assert_eq!(policy.effective("BUNDLE", Some("0")), 1);
        assert_eq!(policy.effective("BUNDLE", None), 1);
        assert_eq!(policy.effective("OTHER", Some("5")), 5);
    }

    #[test]
    fn test_policy_from_json() {
        let policy: QuantityPolicy =
            serde_json::from_str(r#"{"BUNDLE": {"fixed": 2}, "LOOSE": "requested"}"#).unwrap();
        assert_eq!(policy.rule("BUNDLE"), QuantityRule::Fixed(2));
        assert_eq!(policy.rule("LOOSE"), QuantityRule::Requested);
        assert_eq!(policy.rule("UNLISTED"), QuantityRule::Requested);
    }
}
