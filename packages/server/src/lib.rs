#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the amenity map application.
//!
//! Serves the facility working set to the map frontend: per-kind counts
//! for the filter checkboxes, bootstrap config, and the `/api/nearby`
//! endpoint, which re-runs the proximity ranking for a user position on
//! every request. The working set is loaded once at startup and shared
//! immutably, so requests never contend on locks and every response is a
//! pure function of the query.

mod config;
mod handlers;

pub use config::{AppConfig, CONFIG_ENV, ConfigError, DATASET_ENV, DefaultLocation};

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use amenity_map_dataset::Dataset;

/// Shared application state.
pub struct AppState {
    /// The immutable facility working set for this serving session.
    pub dataset: Arc<Dataset>,
    /// Merged server configuration.
    pub config: AppConfig,
}

/// Starts the amenity map API server.
///
/// Loads configuration, reads the dataset once, and serves it until
/// shutdown. This is a regular async function; the caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the configuration cannot be loaded or the dataset file cannot
/// be read and parsed.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = AppConfig::load().expect("Failed to load configuration");

    log::info!("Loading dataset from {}", config.dataset);
    let dataset = Dataset::load_path(Path::new(&config.dataset)).expect("Failed to load dataset");
    log::info!(
        "Serving {} facilities ({} rows dropped)",
        dataset.len(),
        dataset.dropped
    );

    let bind_addr = config.bind_addr.clone();
    let port = config.port;

    let state = web::Data::new(AppState {
        dataset: Arc::new(dataset),
        config,
    });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/kinds", web::get().to(handlers::kinds))
                    .route("/config", web::get().to(handlers::config))
                    .route("/nearby", web::get().to(handlers::nearby)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
