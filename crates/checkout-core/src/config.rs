//! Checkout Configuration
//!
//! Non-secret store settings have built-in defaults; the admin token only
//! ever comes from the environment.
//!
//! | Variable                   | Default                                   |
//! |----------------------------|-------------------------------------------|
//! | `BC_ADMIN_TOKEN`           | none (checkout disabled)                  |
//! | `BC_STORE_HASH`            | `rctyyem8fp`                              |
//! | `BC_API_BASE`              | `https://api.bigcommerce.com/stores/<hash>/v3` |
//! | `BC_CHANNEL_ID`            | `1778657`                                 |
//! | `CHECKOUT_AUTO_MODIFIERS`  | off                                       |
//! | `CHECKOUT_RULES_FILE`      | built-in [`CatalogRules`]                 |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};
use crate::modifier::{Fallback, ModifierOverrides};
use crate::plan::PlanTable;
use crate::quantity::{QuantityPolicy, QuantityRule};

pub const DEFAULT_STORE_HASH: &str = "rctyyem8fp";
pub const DEFAULT_CHANNEL_ID: u64 = 1_778_657;

/// Build the v3 API base URL for a store
pub fn api_base_for(store_hash: &str) -> String {
    format!("https://api.bigcommerce.com/stores/{store_hash}/v3")
}

/// Plan, quantity and modifier tables for the storefront
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogRules {
    pub plans: PlanTable,
    pub quantities: QuantityPolicy,
    pub modifier_overrides: ModifierOverrides,
}

impl Default for CatalogRules {
    fn default() -> Self {
        let plans = PlanTable::new()
            .with("single order", "PUL-30-SRV")
            .with("1 bag subscription", "PUL-30-SRV-SUB")
            .with("2 bag subscription", "PUL-30-SRV-2PAK")
            .with("single", "PUL-30-SRV")
            .with("1bag", "PUL-30-SRV-SUB")
            .with("2bag", "PUL-30-SRV-2PAK")
            .with("monthly", "PUL-30-SRV-SUB")
            .with("double", "PUL-30-SRV-2PAK");

        // The 2-pack SKU is already two bags
        let quantities = QuantityPolicy::new().with_rule("PUL-30-SRV-2PAK", QuantityRule::Fixed(1));

        Self {
            plans,
            quantities,
            modifier_overrides: ModifierOverrides::new(),
        }
    }
}

impl CatalogRules {
    /// Load rules from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CheckoutError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
            .map_err(|e| CheckoutError::Configuration(format!("{}: {e}", path.display())))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| CheckoutError::Configuration(format!("invalid catalog rules: {e}")))
    }
}

/// Everything the checkout pipeline needs to run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Store API base, no trailing slash
    pub api_base: String,

    /// Sales channel carts are created on
    pub channel_id: u64,

    /// Store admin token (`None` disables checkout)
    pub admin_token: Option<String>,

    /// Strategy when no modifier override exists for a SKU
    pub modifier_fallback: Fallback,

    pub rules: CatalogRules,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            api_base: api_base_for(DEFAULT_STORE_HASH),
            channel_id: DEFAULT_CHANNEL_ID,
            admin_token: None,
            modifier_fallback: Fallback::Skip,
            rules: CatalogRules::default(),
        }
    }
}

impl CheckoutConfig {
    /// Load from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store_hash = var("BC_STORE_HASH").unwrap_or_else(|| DEFAULT_STORE_HASH.into());
        let api_base = var("BC_API_BASE")
            .unwrap_or_else(|| api_base_for(&store_hash))
            .trim_end_matches('/')
            .to_string();

        let channel_id = match var("BC_CHANNEL_ID") {
            Some(raw) => raw.parse().map_err(|_| {
                CheckoutError::Configuration(format!("BC_CHANNEL_ID is not a number: {raw}"))
            })?,
            None => DEFAULT_CHANNEL_ID,
        };

        let modifier_fallback = match var("CHECKOUT_AUTO_MODIFIERS") {
            Some(flag) if is_truthy(&flag) => Fallback::DefaultOrFirst,
            _ => Fallback::Skip,
        };

        let rules = match var("CHECKOUT_RULES_FILE") {
            Some(path) => CatalogRules::from_file(path)?,
            None => CatalogRules::default(),
        };

        Ok(Self {
            api_base,
            channel_id,
            admin_token: var("BC_ADMIN_TOKEN"),
            modifier_fallback,
            rules,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.admin_token.is_some()
    }
}

fn is_truthy(flag: &str) -> bool {
    matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
