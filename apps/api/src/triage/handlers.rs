//! Axum route handlers for the Triage API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::triage::models::{TriageInput, TriageResult};
use crate::triage::responder::analyze;

/// POST /api/analyze
///
/// Returns either the crisis panel or guidance for the submitted form.
/// Malformed bodies are reported as validation errors.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<TriageInput>, JsonRejection>,
) -> Result<Json<TriageResult>, AppError> {
    let Json(input) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let span = info_span!("analyze", request_id = %Uuid::new_v4());
    let result = analyze(&input, state.llm.as_ref(), &state.templates)
        .instrument(span)
        .await?;

    Ok(Json(result))
}
