//! HTTP Handlers

use std::any::Any;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use checkout_core::{CheckoutError, CheckoutQuery};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub configured: bool,
    pub catalog: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        configured: state.checkout.is_some(),
        catalog: state.checkout.as_ref().map(|c| c.catalog_name().to_string()),
    })
}

/// Create a cart and redirect to its checkout page
pub async fn buy(
    State(state): State<AppState>,
    query: Result<Query<CheckoutQuery>, QueryRejection>,
) -> Response {
    checkout(&state, query)
        .await
        .unwrap_or_else(|e| error_response(&e))
}

async fn checkout(
    state: &AppState,
    query: Result<Query<CheckoutQuery>, QueryRejection>,
) -> Result<Response, CheckoutError> {
    // Configuration is checked before anything the caller sent
    let service = state.service()?;

    let Query(query) = query.map_err(|rejection| CheckoutError::BadRequest(rejection.body_text()))?;
    let redirect = service.checkout(&query).await?;

    let location = HeaderValue::from_str(&redirect.checkout_url)
        .map_err(|_| CheckoutError::BadGateway("Invalid checkout_url returned".into()))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Render a checkout failure as `{error, detail?}` JSON
pub fn error_response(err: &CheckoutError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        tracing::error!(kind = err.kind(), status = status.as_u16(), "Checkout failed: {}", err);
    } else {
        tracing::warn!(kind = err.kind(), status = status.as_u16(), "Checkout failed: {}", err);
    }

    (status, Json(err.error_body())).into_response()
}

/// Last line of defense: a panic anywhere below becomes a JSON 500
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    error_response(&CheckoutError::Server(detail))
}
