#![allow(dead_code)]

use async_trait::async_trait;
use bookshop::{
    client::PaymentGateway,
    fulfillment::Fulfiller,
    stripe::{webhook, Event, PaymentIntent, PaymentIntentParams, PaymentIntentStatus},
    AppState, Config, GatewayError, WebhookError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const WEBHOOK_SECRET: &str = "whsec_test123secret456";
pub const PUBLISHABLE_KEY: &str = "pk_test_publishable";

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = [
        ("STRIPE_SECRET_KEY", "sk_test_xxx"),
        ("STRIPE_PUBLISHABLE_KEY", PUBLISHABLE_KEY),
        ("STRIPE_WEBHOOK_SECRET", WEBHOOK_SECRET),
        ("BASE_URL", "http://shop.test"),
    ]
    .into_iter()
    .collect();
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).expect("test config")
}

/// Records every call and answers from canned data.
#[derive(Default)]
pub struct FakeGateway {
    pub created: Mutex<Vec<PaymentIntentParams>>,
    pub retrieved: Mutex<Vec<String>>,
    pub intents: Mutex<HashMap<String, PaymentIntent>>,
    pub create_error: Mutex<Option<(u16, Option<String>)>>,
}

impl FakeGateway {
    pub fn with_intent(self, id: &str, amount: i64, status: PaymentIntentStatus) -> Self {
        self.intents.lock().unwrap().insert(id.to_string(), intent(id, amount, status));
        self
    }

    pub fn failing_create(self, status: u16, message: Option<&str>) -> Self {
        *self.create_error.lock().unwrap() = Some((status, message.map(str::to_string)));
        self
    }

    pub fn created(&self) -> Vec<PaymentIntentParams> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_payment_intent(&self, params: &PaymentIntentParams) -> Result<PaymentIntent, GatewayError> {
        self.created.lock().unwrap().push(params.clone());
        if let Some((status, message)) = self.create_error.lock().unwrap().clone() {
            return Err(GatewayError::Rejected {
                status,
                message,
                code: None,
            });
        }
        let n = self.created.lock().unwrap().len();
        let id = format!("pi_fake_{}", n);
        Ok(PaymentIntent {
            client_secret: Some(format!("{}_secret_abc", id)),
            currency: params.currency.clone(),
            metadata: params.metadata.clone(),
            ..intent(&id, params.amount, PaymentIntentStatus::RequiresPaymentMethod)
        })
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, GatewayError> {
        self.retrieved.lock().unwrap().push(id.to_string());
        self.intents
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::Rejected {
                status: 404,
                message: Some(format!("No such payment_intent: '{}'", id)),
                code: Some("resource_missing".into()),
            })
    }

    fn verify_webhook(&self, payload: &[u8], signature_header: Option<&str>) -> Result<Event, WebhookError> {
        webhook::construct_event(payload, signature_header, Some(WEBHOOK_SECRET), 300)
    }
}

#[derive(Default)]
pub struct RecordingFulfiller {
    pub fulfilled: Mutex<Vec<String>>,
}

impl RecordingFulfiller {
    pub fn count(&self) -> usize {
        self.fulfilled.lock().unwrap().len()
    }
}

impl Fulfiller for RecordingFulfiller {
    fn fulfill(&self, intent: &PaymentIntent) {
        self.fulfilled.lock().unwrap().push(intent.id.clone());
    }
}

pub fn intent(id: &str, amount: i64, status: PaymentIntentStatus) -> PaymentIntent {
    PaymentIntent {
        id: id.to_string(),
        amount,
        currency: "usd".to_string(),
        status,
        client_secret: None,
        metadata: Default::default(),
    }
}

pub fn app_state(gateway: Arc<FakeGateway>, fulfiller: Arc<RecordingFulfiller>) -> AppState {
    AppState::new(test_config(), gateway)
        .expect("templates load")
        .with_fulfiller(fulfiller)
}

pub fn signature_header(payload: &str, secret: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let signature = webhook::compute_signature(payload, secret, timestamp).expect("hmac");
    format!("t={},v1={}", timestamp, signature)
}

pub fn event_payload(event_id: &str, event_type: &str, intent_id: &str, amount: i64) -> String {
    serde_json::json!({
        "id": event_id,
        "object": "event",
        "type": event_type,
        "created": 1_700_000_000,
        "data": {
            "object": {
                "id": intent_id,
                "object": "payment_intent",
                "amount": amount,
                "currency": "usd",
                "status": "succeeded"
            }
        }
    })
    .to_string()
}
