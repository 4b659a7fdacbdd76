//! Checkout Pipeline
//!
//! One request, one cart:
//!
//! ```text
//! resolve SKU → look up variant → resolve modifiers → quantity → create cart → URL
//! ```
//!
//! Each step depends on the previous one, so calls are strictly sequential
//! and the first failure ends the request. Nothing is retried. A cart created
//! upstream is never cleaned up, and repeating a request creates another one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{BigCommerceClient, CartRequest, CatalogClient, Variant};
use crate::config::{CatalogRules, CheckoutConfig};
use crate::error::Result;
use crate::modifier::{Fallback, ModifierResolver};
use crate::plan::PlanTable;
use crate::quantity::QuantityPolicy;

/// Query parameters of a buy link
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutQuery {
    /// Plan name, case-insensitive
    #[serde(default)]
    pub plan: Option<String>,

    /// Direct SKU; takes precedence over `plan`
    #[serde(default)]
    pub sku: Option<String>,

    /// Requested quantity, parsed leniently
    #[serde(default)]
    pub qty: Option<String>,
}

/// Result of a successful checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckoutRedirect {
    /// Where to send the shopper
    pub checkout_url: String,
    pub sku: String,
    pub variant: Variant,
    pub quantity: u32,
}

/// Turns buy links into checkout URLs
pub struct CheckoutService {
    catalog: Arc<dyn CatalogClient>,
    channel_id: u64,
    plans: PlanTable,
    quantities: QuantityPolicy,
    modifiers: ModifierResolver,
}

impl CheckoutService {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        channel_id: u64,
        rules: CatalogRules,
        modifier_fallback: Fallback,
    ) -> Self {
        Self {
            catalog,
            channel_id,
            plans: rules.plans,
            quantities: rules.quantities,
            modifiers: ModifierResolver::new(rules.modifier_overrides, modifier_fallback),
        }
    }

    /// Build a BigCommerce-backed service
    ///
    /// Fails with `Configuration` when the admin token is missing.
    pub fn from_config(config: CheckoutConfig) -> Result<Self> {
        let client = BigCommerceClient::from_config(&config)?;
        Ok(Self::new(
            Arc::new(client),
            config.channel_id,
            config.rules,
            config.modifier_fallback,
        ))
    }

    pub fn catalog_name(&self) -> &str {
        self.catalog.name()
    }

    /// Run the full pipeline for one request
    pub async fn checkout(&self, query: &CheckoutQuery) -> Result<CheckoutRedirect> {
        let sku = self
            .plans
            .resolve_sku(query.plan.as_deref(), query.sku.as_deref())?;
        tracing::debug!(sku = %sku, plan = ?query.plan, "Resolved SKU");

        let variant = self.catalog.find_variant(&sku).await?;
        tracing::debug!(
            sku = %sku,
            product_id = variant.product_id,
            variant_id = variant.variant_id,
            "Resolved variant"
        );

        let (option_selections, source) = self
            .modifiers
            .resolve(self.catalog.as_ref(), variant, &sku)
            .await?;
        tracing::debug!(sku = %sku, selections = option_selections.len(), ?source, "Resolved modifiers");

        let quantity = self.quantities.effective(&sku, query.qty.as_deref());

        let request = CartRequest::single(self.channel_id, variant, quantity, option_selections);
        let checkout_url = self.catalog.create_cart(&request).await?;

        tracing::info!(
            sku = %sku,
            product_id = variant.product_id,
            variant_id = variant.variant_id,
            quantity,
            "Cart created"
        );

        Ok(CheckoutRedirect {
            checkout_url,
            sku,
            variant,
            quantity,
        })
    }
}
