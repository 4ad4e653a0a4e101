use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::candidates::validation::parse_candidate;
use crate::errors::AppError;
use crate::models::candidate::CandidateProfile;
use crate::state::AppState;

/// POST /candidates
pub async fn add_candidate(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let new_candidate = parse_candidate(payload)?;
    let candidate = state.candidates.insert(&new_candidate).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Candidate added successfully",
            "data": candidate
        })),
    ))
}

/// GET /candidates/:id
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CandidateProfile>, AppError> {
    let profile = state
        .candidates
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;
    Ok(Json(profile))
}

/// PUT /candidates/:id
///
/// Body fields may arrive as JSON numbers or numeric strings; anything
/// else is a 400. The stage move itself is delegated to the transition
/// service.
pub async fn update_candidate_stage(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let application_id = int_field(&payload, "applicationId")?;
    let new_step_id = int_field(&payload, "currentInterviewStep")?;

    let application = state
        .transitions
        .transition(id, application_id, new_step_id)
        .await?;

    Ok(Json(json!({
        "message": "Candidate stage updated successfully",
        "data": application
    })))
}

fn int_field(payload: &Value, field: &str) -> Result<i32, AppError> {
    let parsed = match payload.get(field) {
        Some(Value::Number(n)) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| AppError::Validation(format!("Invalid {field} format")))
}
