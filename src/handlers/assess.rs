//! Assessment handler

use axum::{extract::State, Json};
use validator::Validate;

use crate::models::{AssessResponse, AssessmentRequest};
use crate::{AppResult, AppState};

/// Run one screening submission through the classifier.
///
/// Synchronous and idempotent: the same six fields always produce the
/// same outcome, and nothing is persisted. Any fault raised while
/// transforming or predicting is caught here and surfaced as a generic
/// failure plus the fault text.
pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<AssessmentRequest>,
) -> AppResult<Json<AssessResponse>> {
    req.validate()?;

    let assessment = state.classifier.assess(&req)?;
    tracing::debug!(outcome = ?assessment.outcome, label = %assessment.label, "assessment complete");

    Ok(Json(AssessResponse::from(assessment)))
}
