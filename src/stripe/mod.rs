pub mod event;
pub mod payment_intent;
pub mod webhook;

pub use event::{Event, EventData};
pub use payment_intent::{PaymentIntent, PaymentIntentParams, PaymentIntentStatus};

/// Secret API key, sent as the basic-auth user on every call.
#[derive(Clone)]
pub struct Auth {
    pub secret: String,
}

impl Auth {
    pub fn new(secret: String) -> Self {
        Auth { secret }
    }
}

/// Error envelope Stripe returns on non-2xx responses.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    pub error: ApiError,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiError {
    pub message: Option<String>,
    pub code: Option<String>,
}
