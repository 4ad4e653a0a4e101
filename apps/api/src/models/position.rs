use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A job opening. `is_visible` gates listing; positions are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PositionRow {
    pub id: i32,
    pub company_id: i32,
    pub interview_flow_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub is_visible: bool,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub employment_type: Option<String>,
    pub benefits: Option<String>,
    pub company_description: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub contact_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFlowRow {
    pub id: i32,
    pub description: Option<String>,
}

/// One named stage in an interview flow. `order_index` defines pipeline
/// column order; ties exist in real data and are broken by `id` downstream.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewStepRow {
    pub id: i32,
    pub interview_flow_id: i32,
    pub interview_type_id: i32,
    pub name: String,
    pub order_index: i32,
}
