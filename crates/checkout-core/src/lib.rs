//! # checkout-core
//!
//! Turns storefront buy links into BigCommerce checkout sessions.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   ?plan=2bag    ┌──────────────┐   variants / carts   ┌──────────────┐
//! │  Storefront  │────────────────▶│   /buy       │─────────────────────▶│  BigCommerce │
//! │  (buy link)  │◀────────────────│   handler    │◀─────────────────────│  v3 API      │
//! └──────────────┘  302 checkout   └──────────────┘   checkout_url       └──────────────┘
//! ```
//!
//! A plan (or a raw SKU) resolves to a catalog variant, required modifiers
//! are filled in if configured, and a single-line cart is created on the
//! storefront's sales channel. The caller is redirected to the cart's hosted
//! checkout page.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutConfig, CheckoutQuery, CheckoutService};
//!
//! let service = CheckoutService::from_config(CheckoutConfig::from_env()?)?;
//!
//! let redirect = service.checkout(&CheckoutQuery {
//!     plan: Some("double".into()),
//!     ..Default::default()
//! }).await?;
//!
//! // Redirect user to: redirect.checkout_url
//! ```

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod modifier;
pub mod plan;
pub mod quantity;

pub use catalog::{BigCommerceClient, CatalogClient, MockCatalogClient};
pub use checkout::{CheckoutQuery, CheckoutRedirect, CheckoutService};
pub use config::{CatalogRules, CheckoutConfig};
pub use error::{CheckoutError, ErrorBody, Result};
pub use modifier::{Fallback, ModifierResolver};
pub use plan::PlanTable;
pub use quantity::{QuantityPolicy, QuantityRule};
