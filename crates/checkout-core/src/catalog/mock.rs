//! Mock Catalog Client
//!
//! In-memory stand-in for the upstream platform. Records every call so tests
//! can assert what was (and wasn't) sent upstream.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{CartRequest, CatalogClient, Modifier, Variant};
use crate::error::{CheckoutError, Result};

/// A call made against [`MockCatalogClient`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogCall {
    FindVariant(String),
    ProductModifiers(u64),
    CreateCart(CartRequest),
}

#[derive(Clone, Debug)]
enum CartOutcome {
    /// Checkout URLs are `<base>/<n>`, one per cart
    Url(String),
    MissingUrl,
    Rejected { status: u16, body: Value },
}

/// Mock catalog with static variants and scripted cart responses
pub struct MockCatalogClient {
    variants: HashMap<String, Variant>,
    modifiers: HashMap<u64, Vec<Modifier>>,
    cart: CartOutcome,
    calls: Mutex<Vec<CatalogCall>>,
}

impl Default for MockCatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogClient {
    pub fn new() -> Self {
        Self {
            variants: HashMap::new(),
            modifiers: HashMap::new(),
            cart: CartOutcome::Url("https://checkout.example/cart".into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_variant(mut self, sku: impl Into<String>, variant_id: u64, product_id: u64) -> Self {
        self.variants.insert(sku.into(), Variant { variant_id, product_id });
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, product_id: u64, modifiers: Vec<Modifier>) -> Self {
        self.modifiers.insert(product_id, modifiers);
        self
    }

    /// Checkout URLs handed out will be `<base>/<cart number>`
    #[must_use]
    pub fn with_checkout_base(mut self, base: impl Into<String>) -> Self {
        self.cart = CartOutcome::Url(base.into());
        self
    }

    /// Carts are created but the response carries no checkout URL
    #[must_use]
    pub fn without_checkout_url(mut self) -> Self {
        self.cart = CartOutcome::MissingUrl;
        self
    }

    /// Cart creation is rejected with this status and body
    #[must_use]
    pub fn rejecting_carts(mut self, status: u16, body: Value) -> Self {
        self.cart = CartOutcome::Rejected { status, body };
        self
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Cart requests sent so far
    pub fn carts(&self) -> Vec<CartRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CatalogCall::CreateCart(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: CatalogCall) -> usize {
        match self.calls.lock() {
            Ok(mut calls) => {
                calls.push(call);
                calls.len()
            }
            Err(_) => 0,
        }
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn find_variant(&self, sku: &str) -> Result<Variant> {
        self.record(CatalogCall::FindVariant(sku.to_string()));
        self.variants
            .get(sku)
            .copied()
            .ok_or_else(|| CheckoutError::NotFound(format!("SKU not found or unavailable: {sku}")))
    }

    async fn product_modifiers(&self, product_id: u64) -> Result<Vec<Modifier>> {
        self.record(CatalogCall::ProductModifiers(product_id));
        Ok(self.modifiers.get(&product_id).cloned().unwrap_or_default())
    }

    async fn create_cart(&self, request: &CartRequest) -> Result<String> {
        let n = self.record(CatalogCall::CreateCart(request.clone()));
        match &self.cart {
            CartOutcome::Url(base) => Ok(format!("{base}/{n}")),
            CartOutcome::MissingUrl => Err(CheckoutError::BadGateway("No checkout_url returned".into())),
            CartOutcome::Rejected { status, body } => Err(CheckoutError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "MockCatalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_catalog() {
        let catalog = MockCatalogClient::new().with_variant("SKU-1", 7, 3);

        let variant = catalog.find_variant("SKU-1").await.unwrap();
        assert_eq!(variant, Variant { variant_id: 7, product_id: 3 });

        let err = catalog.find_variant("SKU-2").await.unwrap_err();
        assert_eq!(err.status_code(), 404);

        assert_eq!(
            catalog.calls(),
            vec![
                CatalogCall::FindVariant("SKU-1".into()),
                CatalogCall::FindVariant("SKU-2".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_each_cart_gets_its_own_url() {
        let catalog = MockCatalogClient::new().with_checkout_base("https://c.test");
        let request = CartRequest::single(1, Variant { variant_id: 1, product_id: 1 }, 1, Vec::new());

        let first = catalog.create_cart(&request).await.unwrap();
        let second = catalog.create_cart(&request).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(catalog.carts().len(), 2);
    }
}
