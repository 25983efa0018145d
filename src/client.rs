use crate::{
    config::Config,
    error::{GatewayError, WebhookError},
    stripe::{webhook, Auth, ErrorBody, Event, PaymentIntent, PaymentIntentParams},
};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Response, Url};

/// The three things the shop needs from a payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(&self, params: &PaymentIntentParams) -> Result<PaymentIntent, GatewayError>;

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, GatewayError>;

    fn verify_webhook(&self, payload: &[u8], signature_header: Option<&str>) -> Result<Event, WebhookError>;
}

/// Stripe REST client. Form-encoded requests, basic auth with the secret
/// key, one bounded timeout per call and no retries.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    auth: Option<Auth>,
    api_base: Url,
    webhook_secret: Option<String>,
    webhook_tolerance_secs: i64,
}

impl StripeClient {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder().timeout(config.request_timeout).build()?;
        let api_base =
            Url::parse(&config.api_base).map_err(|_| GatewayError::InvalidApiBase(config.api_base.clone()))?;
        if api_base.cannot_be_a_base() {
            return Err(GatewayError::InvalidApiBase(config.api_base.clone()));
        }
        Ok(Self {
            http,
            auth: config.secret_key.clone().map(Auth::new),
            api_base,
            webhook_secret: config.webhook_secret.clone(),
            webhook_tolerance_secs: config.webhook_tolerance_secs,
        })
    }

    fn auth(&self) -> Result<&Auth, GatewayError> {
        self.auth.as_ref().ok_or(GatewayError::MissingCredentials)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidApiBase(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_payment_intent(response: Response) -> Result<PaymentIntent, GatewayError> {
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        let (message, code) = match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(ErrorBody { error }) => (error.message, error.code),
            Err(_) => (None, None),
        };
        warn!("Stripe answered HTTP {} code={:?} message={:?}", status.as_u16(), code, message);
        Err(GatewayError::Rejected {
            status: status.as_u16(),
            message,
            code,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_payment_intent(&self, params: &PaymentIntentParams) -> Result<PaymentIntent, GatewayError> {
        let auth = self.auth()?;
        let url = self.endpoint(&["v1", "payment_intents"])?;
        let mut request = self
            .http
            .post(url)
            .basic_auth(auth.secret.as_str(), None::<&str>)
            .form(&params.to_params());
        if let Some(key) = &params.idempotency_key {
            request = request.header("Idempotency-Key", key.as_str());
        }
        debug!(
            "creating payment intent amount={} currency={} idempotent={}",
            params.amount,
            params.currency,
            params.idempotency_key.is_some()
        );
        let response = request.send().await?;
        Self::read_payment_intent(response).await
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, GatewayError> {
        let auth = self.auth()?;
        let url = self.endpoint(&["v1", "payment_intents", id])?;
        let response = self
            .http
            .get(url)
            .basic_auth(auth.secret.as_str(), None::<&str>)
            .send()
            .await?;
        Self::read_payment_intent(response).await
    }

    fn verify_webhook(&self, payload: &[u8], signature_header: Option<&str>) -> Result<Event, WebhookError> {
        webhook::construct_event(
            payload,
            signature_header,
            self.webhook_secret.as_deref(),
            self.webhook_tolerance_secs,
        )
    }
}
