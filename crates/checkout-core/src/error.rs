//! Checkout Error Types

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Checkout failures, one per response the handler can produce
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Server-side misconfiguration (missing credential, unfillable modifier)
    #[error("{0}")]
    Configuration(String),

    /// Caller asked for a plan we don't sell
    #[error("{0}")]
    BadRequest(String),

    /// SKU is unknown upstream
    #[error("{0}")]
    NotFound(String),

    /// Upstream rejected the request; status and body are relayed as-is
    #[error("Upstream error ({status})")]
    Upstream { status: u16, body: Value },

    /// Upstream answered 2xx but broke its response contract
    #[error("{0}")]
    BadGateway(String),

    /// Anything unexpected (transport, decoding, ...)
    #[error("Server error: {0}")]
    Server(String),
}

/// JSON error payload: `{"error": "...", "detail": "..."}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl CheckoutError {
    /// HTTP status the caller should see
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration(_) | Self::Server(_) => 500,
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Upstream { status, .. } => *status,
            Self::BadGateway(_) => 502,
        }
    }

    /// JSON body the caller should see
    ///
    /// Upstream rejections are passed through untouched so the platform's own
    /// diagnostics reach the caller.
    pub fn error_body(&self) -> Value {
        let body = match self {
            Self::Upstream { body, .. } => return body.clone(),
            Self::Server(detail) => ErrorBody::new("Server error").with_detail(detail.clone()),
            Self::Configuration(msg)
            | Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::BadGateway(msg) => ErrorBody::new(msg.clone()),
        };
        serde_json::to_value(body).unwrap_or(Value::Null)
    }

    /// Short machine-friendly kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Upstream { .. } => "upstream",
            Self::BadGateway(_) => "bad_gateway",
            Self::Server(_) => "server",
        }
    }
}

impl From<reqwest::Error> for CheckoutError {
    fn from(err: reqwest::Error) -> Self {
        Self::Server(err.to_string())
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Server(err.to_string())
    }
}
