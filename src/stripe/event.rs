use super::PaymentIntent;
use serde::Deserialize;

pub const PAYMENT_INTENT_SUCCEEDED: &str = "payment_intent.succeeded";

/// A webhook event as delivered by Stripe. Only trust one that came out of
/// [`super::webhook::construct_event`].
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub created: i64,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

impl Event {
    pub fn is_payment_succeeded(&self) -> bool {
        self.event_type == PAYMENT_INTENT_SUCCEEDED
    }

    /// The event's object read as a PaymentIntent, if it is one.
    pub fn payment_intent(&self) -> Option<PaymentIntent> {
        serde_json::from_value(self.data.object.clone()).ok()
    }
}
