//! Catalog Integration
//!
//! The upstream commerce platform sits behind [`CatalogClient`] so the
//! checkout pipeline can run against BigCommerce in production and an
//! in-memory double in tests.

mod bigcommerce;
mod mock;
mod model;

pub use bigcommerce::BigCommerceClient;
pub use mock::{CatalogCall, MockCatalogClient};
pub use model::{CartRequest, LineItem, Modifier, ModifierValue, OptionSelection, Variant};

use async_trait::async_trait;

use crate::error::Result;

/// Upstream catalog/cart client (Strategy pattern)
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Resolve a SKU to its variant.
    ///
    /// Fails with `NotFound` when the SKU is absent or the lookup is rejected.
    async fn find_variant(&self, sku: &str) -> Result<Variant>;

    /// All modifiers defined on a product
    async fn product_modifiers(&self, product_id: u64) -> Result<Vec<Modifier>>;

    /// Create a cart and return its checkout URL
    async fn create_cart(&self, request: &CartRequest) -> Result<String>;

    /// Client name, for logs and health output
    fn name(&self) -> &str;
}
