use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::position::PositionRow;
use crate::pipeline::directory::InterviewFlowView;
use crate::pipeline::roster::PipelineCandidate;
use crate::state::AppState;

/// GET /positions
pub async fn list_positions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PositionRow>>, AppError> {
    Ok(Json(state.directory.list_positions().await?))
}

/// GET /positions/:id/interviewflow
pub async fn get_interview_flow(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<InterviewFlowView>, AppError> {
    Ok(Json(state.directory.interview_flow(id).await?))
}

/// GET /positions/:id/candidates
pub async fn get_position_candidates(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<PipelineCandidate>>, AppError> {
    Ok(Json(state.roster.candidates_for_position(id).await?))
}
