//! A small book storefront: a fixed catalog, Stripe PaymentIntent checkout,
//! webhook confirmation and a success page that re-checks the payment.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod event_store;
pub mod fulfillment;
pub mod render;
pub mod server;
pub mod stripe;

pub use catalog::{Catalog, CatalogItem};
pub use client::{PaymentGateway, StripeClient};
pub use config::Config;
pub use error::{GatewayError, StoreError, WebhookError};
pub use server::{configure, AppState};
