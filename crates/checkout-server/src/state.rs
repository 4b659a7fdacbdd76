//! Application State

use std::sync::Arc;

use checkout_core::{CheckoutError, CheckoutService};

const MISSING_TOKEN: &str = "Server not configured: missing BC_ADMIN_TOKEN";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout pipeline (None if the catalog client could not be configured)
    pub checkout: Option<Arc<CheckoutService>>,

    /// Why checkout is disabled, reported on every `/buy` while it is
    pub unavailable: Arc<str>,
}

impl AppState {
    pub fn new(checkout: Option<CheckoutService>) -> Self {
        Self {
            checkout: checkout.map(Arc::new),
            unavailable: Arc::from(MISSING_TOKEN),
        }
    }

    /// Checkout disabled for the given reason
    pub fn disabled(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self {
            checkout: None,
            unavailable: Arc::from(reason),
        }
    }

    /// State from the outcome of building the checkout service
    pub fn from_service(service: checkout_core::Result<CheckoutService>) -> Self {
        match service {
            Ok(service) => Self::new(Some(service)),
            Err(e) => Self::disabled(e.to_string()),
        }
    }

    /// The configured pipeline, or the error explaining its absence
    pub fn service(&self) -> Result<&CheckoutService, CheckoutError> {
        self.checkout
            .as_deref()
            .ok_or_else(|| CheckoutError::Configuration(self.unavailable.to_string()))
    }
}
