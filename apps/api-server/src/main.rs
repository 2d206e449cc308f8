//! # Inkwell API Server
//!
//! Blog backend: sessions, post publishing with tags, and tag lookup.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use inkwell_core::ports::{PasswordService, TokenService};
use inkwell_infra::{Argon2PasswordService, JwtTokenService};

mod config;
mod forms;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Inkwell API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    let form_limits = config.forms;
    let state = web::Data::new(state);
    let token_service = web::Data::new(token_service);
    let password_service = web::Data::new(password_service);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(token_service.clone())
            .app_data(password_service.clone())
            .configure(|cfg| handlers::configure_routes(cfg, form_limits))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
