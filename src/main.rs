//! Aula Spanish Curriculum Backend
//!
//! A REST backend with SQLite persistence that imports the Spanish course
//! curriculum (topics per CEFR level) from a Google Sheets spreadsheet.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod import;
mod jobs;
mod models;
mod sheets;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use jobs::{InMemoryJobStore, JobStore};
use sheets::{ServiceAccountKey, SheetRowSource, SheetsClient, UnconfiguredSheets};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub rows: Arc<dyn SheetRowSource>,
    pub jobs: Arc<dyn JobStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Aula Spanish Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Curriculum spreadsheet: {}", config.sheet_id);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (AULA_API_PSK). Authentication is disabled!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Wire up the spreadsheet reader; without credentials the import
    // endpoints stay reachable but every run fails up front.
    let rows: Arc<dyn SheetRowSource> = match config.google.as_ref() {
        Some(account) => {
            let key = ServiceAccountKey::from_account(account)?;
            tracing::info!(
                "Google Sheets access as {} (project {})",
                key.client_email(),
                account.project_id
            );
            Arc::new(SheetsClient::new(
                key,
                config.sheet_id.clone(),
                config.google_token_url.clone(),
                config.sheets_api_base.clone(),
            ))
        }
        None => {
            tracing::warn!(
                "No Google service account configured (GOOGLE_SERVICE_ACCOUNT_KEY or GOOGLE_* variables). Content imports will fail until credentials are provided."
            );
            Arc::new(UnconfiguredSheets)
        }
    };

    // Job registry lives in memory; restarting the server forgets finished jobs
    let jobs: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());

    // Create application state
    let state = AppState {
        repo,
        rows,
        jobs,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Bulk import (destructive wipe-and-reimport)
        .route("/admin/content/import", post(api::trigger_bulk_import))
        .route("/admin/content/import", get(api::get_bulk_import_status))
        // Resume import (non-destructive, batched)
        .route(
            "/admin/content/resume-import",
            post(api::trigger_resume_import),
        )
        .route(
            "/admin/content/resume-import",
            get(api::get_resume_import_status),
        )
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
