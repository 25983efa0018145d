use crate::{catalog::format_amount, stripe::PaymentIntent};
use log::info;

/// Runs once per verified `payment_intent.succeeded` event.
pub trait Fulfiller: Send + Sync {
    fn fulfill(&self, intent: &PaymentIntent);
}

/// Fulfillment is a log line; shipping and receipts live elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFulfiller;

impl Fulfiller for LogFulfiller {
    fn fulfill(&self, intent: &PaymentIntent) {
        info!("[webhook] Payment succeeded: {} for {}", intent.id, format_amount(intent.amount));
    }
}
