use crate::{
    catalog::Catalog,
    client::PaymentGateway,
    config::Config,
    error::StoreError,
    event_store::ProcessedEvents,
    fulfillment::{Fulfiller, LogFulfiller},
    render::Renderer,
    stripe::{webhook::SIGNATURE_HEADER, PaymentIntentParams, PaymentIntentStatus},
};
use actix_web::{http::header::ContentType, web, HttpRequest, HttpResponse};
use log::{debug, error, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Everything the handlers share. Only `processed` changes after startup.
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub gateway: Arc<dyn PaymentGateway>,
    pub fulfiller: Arc<dyn Fulfiller>,
    pub renderer: Renderer,
    pub processed: ProcessedEvents,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn PaymentGateway>) -> Result<Self, tera::Error> {
        Ok(Self {
            config,
            catalog: Catalog::new(),
            gateway,
            fulfiller: Arc::new(LogFulfiller),
            renderer: Renderer::new()?,
            processed: ProcessedEvents::new(),
        })
    }

    pub fn with_fulfiller(mut self, fulfiller: Arc<dyn Fulfiller>) -> Self {
        self.fulfiller = fulfiller;
        self
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .route("/checkout", web::get().to(checkout))
        .route("/create-payment-intent", web::post().to(create_payment_intent))
        .route("/webhook", web::post().to(webhook))
        .route("/success", web::get().to(success))
        .route("/js/checkout.js", web::get().to(checkout_script))
        .route("/css/style.css", web::get().to(stylesheet));
}

const CHECKOUT_JS: &str = include_str!("../static/js/checkout.js");
const STYLE_CSS: &str = include_str!("../static/css/style.css");

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

async fn checkout_script() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/javascript; charset=utf-8")
        .body(CHECKOUT_JS)
}

async fn stylesheet() -> HttpResponse {
    HttpResponse::Ok().content_type("text/css; charset=utf-8").body(STYLE_CSS)
}

async fn index(state: web::Data<AppState>) -> Result<HttpResponse, StoreError> {
    Ok(html(state.renderer.index(state.catalog.items())?))
}

/// First value of `key` in the query string. Repeated keys and malformed
/// pairs never fail the request; later duplicates are ignored.
fn query_param(req: &HttpRequest, key: &str) -> Option<String> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();
    pairs.into_iter().find(|(name, _)| name == key).map(|(_, value)| value)
}

async fn checkout(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, StoreError> {
    let requested = query_param(&req, "item");
    let item = requested.as_deref().and_then(|id| state.catalog.get(id));
    let Some(item) = item else {
        debug!("checkout for unknown item {:?}", requested);
        return Ok(html(state.renderer.checkout_error("No item selected")?));
    };

    let publishable_key = state.config.publishable_key.as_deref().unwrap_or_default();
    let page = state
        .renderer
        .checkout(item, publishable_key, &state.config.success_url())?;
    Ok(html(page))
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    pub item: Option<String>,
    #[serde(rename = "idempotencyKey")]
    pub idempotency_key: Option<String>,
}

async fn create_payment_intent(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, StoreError> {
    let request: CreatePaymentIntentRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("unreadable create-payment-intent body: {}", e);
        StoreError::NotFound
    })?;
    let item = request
        .item
        .as_deref()
        .and_then(|id| state.catalog.get(id))
        .ok_or(StoreError::NotFound)?;

    let params = PaymentIntentParams::for_item(item, request.idempotency_key);
    let intent = state.gateway.create_payment_intent(&params).await.map_err(|e| {
        error!("creating payment intent for item {} failed: {}", item.id, e);
        StoreError::from(e)
    })?;

    info!("created payment intent {} for item {} ({})", intent.id, item.id, item.price());
    Ok(HttpResponse::Ok().json(json!({
        "clientSecret": intent.client_secret,
        "paymentIntentId": intent.id,
    })))
}

async fn webhook(state: web::Data<AppState>, req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, StoreError> {
    let signature = req.headers().get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let event = state.gateway.verify_webhook(&body, signature).map_err(|e| {
        warn!("[webhook] rejected delivery: {} ({})", e, e.reason());
        StoreError::from(e)
    })?;

    if !state.processed.mark(&event.id).await {
        info!("[webhook] event {} already processed, skipping", event.id);
        return Ok(HttpResponse::Ok().finish());
    }

    if event.is_payment_succeeded() {
        match event.payment_intent() {
            Some(intent) => state.fulfiller.fulfill(&intent),
            None => warn!("[webhook] event {} carries no readable payment intent", event.id),
        }
    } else {
        debug!("[webhook] ignoring event {} of type {}", event.id, event.event_type);
    }

    Ok(HttpResponse::Ok().finish())
}

async fn success(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, StoreError> {
    let payment_intent = query_param(&req, "payment_intent");
    let Some(id) = payment_intent.as_deref().filter(|id| !id.is_empty()) else {
        return Ok(html(state.renderer.success_error("No payment information found")?));
    };

    let intent = match state.gateway.retrieve_payment_intent(id).await {
        Ok(intent) => intent,
        Err(e) => {
            error!("retrieving payment intent {} failed: {}", id, e);
            return Ok(html(state.renderer.success_error("Unable to retrieve payment details")?));
        }
    };

    // The redirect alone proves nothing; only Stripe's status does.
    if intent.status != PaymentIntentStatus::Succeeded {
        info!("payment intent {} reached /success with status {}", intent.id, intent.status);
        let message = StoreError::Unconfirmed.to_string();
        return Ok(html(state.renderer.success_error(&message)?));
    }

    Ok(html(state.renderer.success(&intent)?))
}
