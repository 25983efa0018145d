use actix_cors::Cors;
use actix_web::{
    http::{header, uri::Uri},
    middleware::Logger as ActixLogger,
    web, App, HttpServer,
};
use bookshop::{configure, AppState, Config, StripeClient};
use chrono::Local;
use colored::*;
use dotenvy::dotenv;
use env_logger::{Builder, Env};
use log::{debug, error, info, warn};
use std::{
    env as stdenv,
    fs::File,
    io::{BufRead, BufReader, Error as IOError, ErrorKind, Write},
    path::Path,
    process::id as process_id,
    sync::Arc,
};

mod cors;
mod env;
mod logger;
use crate::cors::*;
use crate::env::*;
use crate::logger::*;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

fn startup_error<E: std::fmt::Display>(what: &str, e: E) -> IOError {
    error!("{}: {}", what, e);
    IOError::new(ErrorKind::Other, format!("{}: {}", what, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    setup_logger();
    load_env_file();

    info!("{} {} starting, PID: {}", NAME, VERSION, process_id());

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    report_missing_keys(&config);
    debug!("{:?}", config);

    let gateway = StripeClient::new(&config).map_err(|e| startup_error("Cannot build Stripe client", e))?;
    let bind_address = config.bind_address();
    let state = AppState::new(config, Arc::new(gateway)).map_err(|e| startup_error("Cannot load templates", e))?;
    let state = web::Data::new(state);

    let cors_origins = load_and_validate_cors_origins(CORS_FILE).map_err(|e| startup_error("Failed to load CORS origins", e))?;
    info!("Allowed cors_origins: {:?}", cors_origins);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(ActixLogger::default())
            .wrap(build_cors(&cors_origins))
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&bind_address)
    .map_err(|e| startup_error(&format!("Cannot bind {}", bind_address), e))?
    .run();

    info!("Server running at http://{}", bind_address);

    let execution = server.await;
    info!("Worker stopped with PID: {}", process_id());
    if let Err(e) = execution {
        error!("Server runtime failure: {:?}", e);
        return Err(e);
    }
    Ok(())
}
