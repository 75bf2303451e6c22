//! CKD Screening Service
//!
//! Collects six clinical fields through a web form and classifies them
//! with a pre-trained chronic kidney disease model.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     CKD SCREEN                           │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌────────────┐  ┌─────────────┐  ┌───────────────────┐ │
//! │  │  Form Page │  │  Assess API │  │  Model Status API │ │
//! │  │  (static)  │  │  (Axum)     │  │                   │ │
//! │  └──────┬─────┘  └──────┬──────┘  └─────────┬─────────┘ │
//! │         └───────────────┼───────────────────┘            │
//! │                         ▼                                │
//! │               ┌──────────────────┐                       │
//! │               │ Classifier cache │  loaded once, shared  │
//! │               │ (decision tree)  │  read-only            │
//! │               └──────────────────┘                       │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod classifier;
mod models;
mod handlers;
mod error;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "ckd_screen=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("CKD Screening Service starting...");

    // Load the classifier artifact once for the process lifetime
    let classifier = classifier::registry::load(&config.model_path)
        .expect("Failed to load classifier artifact");

    // Build application state
    let state = AppState {
        classifier,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable handle to the process-cached classifier
    pub classifier: &'static classifier::Classifier,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/health", get(handlers::health::check))
        .route("/api/v1/assess", post(handlers::assess::submit))
        .route("/api/v1/model", get(handlers::model::status))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
