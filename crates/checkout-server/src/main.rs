//! Checkout Redirect Server
//!
//! Axum-based server behind storefront "Buy" buttons. `GET /buy?plan=..`
//! creates a BigCommerce cart and redirects to its hosted checkout.

mod handlers;
mod state;

use axum::{Router, routing::get};
use checkout_core::{CheckoutConfig, CheckoutService};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::handlers::{buy, handle_panic, health_check};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CheckoutConfig::from_env()?;
    tracing::info!(
        api_base = %config.api_base,
        channel_id = config.channel_id,
        plans = config.rules.plans.len(),
        modifier_fallback = ?config.modifier_fallback,
        "Loaded checkout configuration"
    );

    // Without a usable token the server still starts; /buy answers 500
    let state = AppState::from_service(CheckoutService::from_config(config));
    match &state.checkout {
        Some(service) => tracing::info!("✓ Catalog configured ({})", service.catalog_name()),
        None => {
            tracing::warn!("⚠ {} - checkout disabled", state.unavailable);
            tracing::warn!("  Set a valid BC_ADMIN_TOKEN in .env");
        }
    }

    let app = build_router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("checkout-server running on http://{}", addr);
    tracing::info!("  GET  /health                      - Health check");
    tracing::info!("  GET  /buy?plan=..|sku=..&qty=..   - Redirect to checkout");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Routes plus middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/buy", get(buy))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
