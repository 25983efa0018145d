use crate::catalog::CatalogItem;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

pub const CURRENCY: &str = "usd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentIntentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentIntentStatus::RequiresPaymentMethod => "requires_payment_method",
            PaymentIntentStatus::RequiresConfirmation => "requires_confirmation",
            PaymentIntentStatus::RequiresAction => "requires_action",
            PaymentIntentStatus::Processing => "processing",
            PaymentIntentStatus::RequiresCapture => "requires_capture",
            PaymentIntentStatus::Canceled => "canceled",
            PaymentIntentStatus::Succeeded => "succeeded",
            PaymentIntentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stripe's record of a payment attempt. Only the fields the shop reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: PaymentIntentStatus,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// What gets sent to `POST /v1/payment_intents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentParams {
    pub amount: i64,
    pub currency: String,
    pub automatic_payment_methods: bool,
    pub metadata: BTreeMap<String, String>,
    /// Forwarded untouched as the `Idempotency-Key` header.
    pub idempotency_key: Option<String>,
}

impl PaymentIntentParams {
    /// Builds a charge for one catalog item. The amount always comes from the catalog.
    pub fn for_item(item: &CatalogItem, idempotency_key: Option<String>) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("item_id".to_string(), item.id.to_string());
        metadata.insert("book_title".to_string(), item.title.to_string());
        PaymentIntentParams {
            amount: item.amount,
            currency: CURRENCY.to_string(),
            automatic_payment_methods: true,
            metadata,
            idempotency_key,
        }
    }

    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("amount".to_string(), self.amount.to_string()),
            ("currency".to_string(), self.currency.clone()),
        ];
        if self.automatic_payment_methods {
            params.push(("automatic_payment_methods[enabled]".to_string(), "true".to_string()));
        }
        for (key, value) in &self.metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }
        params
    }
}
