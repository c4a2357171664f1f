//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{AnalysisRequest, AnalysisResponse};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /analyze
///
/// Diagnoses the reasoning mistake in `reasoning` for `problem`. Empty, unsafe,
/// or unparseable generations still return 200 with a structured body. Only
/// generator failures return an error status.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        mode = request.mode().as_str(),
        problem_len = request.problem.len(),
        reasoning_len = request.reasoning.len(),
        "Analysis requested"
    );

    let response = state.orchestrator.analyze(&request).await?;

    info!(%request_id, mistake_type = %response.mistake_type, "Analysis complete");
    Ok(Json(response))
}
