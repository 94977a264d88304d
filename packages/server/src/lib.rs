#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the police postcode dashboard.
//!
//! `GET /api/dashboard/{postcode}` runs one full geocode → fetch →
//! aggregate pass and returns the resulting
//! [`police_postcode_dashboard::Dashboard`] as JSON for a frontend to draw.
//! Requests share nothing but the two HTTP clients.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use police_postcode_geocoder::{GeocodingService, PostcodeResolver, PostcodesIo};
use police_postcode_source::{CrimeService, CrimeSource, PoliceUk};

/// Shared application state.
pub struct AppState {
    /// Postcode geocoder.
    pub resolver: Arc<dyn PostcodeResolver>,
    /// Crime outcome source.
    pub source: Arc<dyn CrimeSource>,
}

impl AppState {
    /// Builds the production clients from the embedded service
    /// configuration plus environment overrides.
    #[must_use]
    pub fn from_env() -> Self {
        let client = reqwest::Client::new();
        let geocoder = GeocodingService::from_env();
        let crimes = CrimeService::from_env();

        log::info!("Geocoder: {} ({})", geocoder.name, geocoder.base_url);
        log::info!("Crime source: {} ({})", crimes.name, crimes.base_url);

        Self {
            resolver: Arc::new(PostcodesIo::from_service(client.clone(), &geocoder)),
            source: Arc::new(PoliceUk::from_service(client, &crimes)),
        }
    }
}

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface address, from `BIND_ADDR` (default `127.0.0.1`).
    pub bind_addr: String,
    /// Port, from `PORT` (default `8080`).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        Self { bind_addr, port }
    }
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/dashboard/{postcode}", web::get().to(handlers::dashboard)),
    );
}

/// Starts the API server and runs until shutdown.
///
/// The caller provides the async runtime (e.g. `#[actix_web::main]`) and
/// is responsible for initialising logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(state: AppState, config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(state);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
