use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The join of one candidate to one position. Aggregate root for pipeline
/// display: it owns the current-step pointer, and its interviews are
/// append-only children.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub id: i32,
    pub position_id: i32,
    pub candidate_id: i32,
    pub application_date: DateTime<Utc>,
    pub current_interview_step: i32,
    pub notes: Option<String>,
}

/// One scored evaluation event. Never mutated after creation; `score` may be
/// absent when the interview has not been graded yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRow {
    pub id: i32,
    pub application_id: i32,
    pub interview_step_id: i32,
    pub employee_id: i32,
    pub interview_date: DateTime<Utc>,
    pub result: Option<String>,
    pub score: Option<i32>,
    pub notes: Option<String>,
}
