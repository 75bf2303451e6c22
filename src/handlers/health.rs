//! Health check handler

use axum::Json;
use serde::Serialize;

use crate::classifier::registry;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model_loaded: bool,
    timestamp: i64,
}

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model_loaded: registry::get().is_some(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
