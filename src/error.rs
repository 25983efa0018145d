use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failures talking to the payment processor.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("STRIPE_SECRET_KEY is not configured")]
    MissingCredentials,

    #[error("invalid Stripe API base URL: {0}")]
    InvalidApiBase(String),

    /// Stripe answered with an error body (card declined, bad request, auth failure...).
    #[error("Stripe rejected the request (HTTP {}): {}", .status, .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
        code: Option<String>,
    },

    #[error("network error talking to Stripe: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode Stripe response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    /// The processor's own human readable message, when it sent one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn display_message(&self) -> String {
        self.user_message()
            .map(str::to_owned)
            .unwrap_or_else(|| self.to_string())
    }
}

/// Reasons a webhook delivery is refused. The `Display` text is exactly
/// what goes back to the caller; details are only logged.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Invalid payload")]
    InvalidPayload(String),

    #[error("Invalid signature")]
    InvalidSignature(String),
}

impl WebhookError {
    pub fn reason(&self) -> &str {
        match self {
            WebhookError::InvalidPayload(reason) | WebhookError::InvalidSignature(reason) => reason,
        }
    }
}

/// Per-request failures at the HTTP boundary. None of them stop the process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid item")]
    NotFound,

    #[error("{}", .0.display_message())]
    GatewayRejected(#[from] GatewayError),

    #[error(transparent)]
    VerificationFailed(#[from] WebhookError),

    #[error("Payment has not been completed")]
    Unconfirmed,

    #[error("template rendering failed: {0}")]
    Render(#[from] tera::Error),
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound | StoreError::GatewayRejected(_) | StoreError::VerificationFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            StoreError::Unconfirmed => StatusCode::OK,
            StoreError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            StoreError::NotFound | StoreError::GatewayRejected(_) => response.json(json!({ "error": self.to_string() })),
            StoreError::VerificationFailed(_) | StoreError::Unconfirmed => {
                response.content_type("text/plain; charset=utf-8").body(self.to_string())
            }
            StoreError::Render(_) => response
                .content_type("text/plain; charset=utf-8")
                .body("Internal Server Error"),
        }
    }
}
