//! Model status handler

use axum::{extract::State, Json};

use crate::classifier::ModelStatus;
use crate::AppState;

/// Classifier status for the page sidebar.
pub async fn status(State(state): State<AppState>) -> Json<ModelStatus> {
    Json(state.classifier.status())
}
