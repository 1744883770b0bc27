#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web proxy server for the crime explorer.
//!
//! Forwards queries to the FBI Crime Data Explorer API so a browser
//! frontend does not have to deal with CORS or API keys, and serves the
//! normalized yearly aggregates and derived metrics built on top of the
//! raw payloads.

pub mod cache;
mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error, middleware, web};
use crime_explorer_upstream::{CdeClient, CdeConfig, UpstreamError};
use thiserror::Error;

/// Errors that can stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The upstream client could not be built.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Where to listen and which upstream to talk to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub cde: CdeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            cde: CdeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, plus the upstream settings read by
    /// [`CdeConfig::from_env`]. Unset or unparsable values keep their
    /// defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            bind_addr,
            port,
            cde: CdeConfig::from_env(),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Upstream API client.
    pub client: CdeClient,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/summarized", web::get().to(handlers::summarized))
            .route("/summarized/yearly", web::get().to(handlers::summarized_yearly))
            .route("/hate-crime", web::get().to(handlers::hate_crime))
            .route(
                "/hate-crime/breakdown",
                web::get().to(handlers::hate_crime_breakdown),
            )
            .route("/agencies", web::get().to(handlers::agencies))
            .route("/agency-crime", web::get().to(handlers::agency_crime))
            .route("/state-map", web::get().to(handlers::state_map))
            .route("/overview", web::get().to(handlers::overview)),
    );
}

/// Rejects unparsable query strings with a JSON `{ "error": ... }` body
/// instead of Actix's plain-text default.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        let message = err.to_string();
        log::error!("bad query for {}: {message}", req.path());
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}

/// Starts the crime explorer proxy server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns [`ServerError::Upstream`] if the HTTP client cannot be built
/// and [`ServerError::Io`] if the server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let client = CdeClient::new(config.cde)?;
    log::info!(
        "Proxying {} (concurrency {}, API key {})",
        client.config().base_url,
        client.config().concurrency,
        if client.config().api_key.is_some() {
            "set"
        } else {
            "not set"
        }
    );

    let state = web::Data::new(AppState { client });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(query_config())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}
