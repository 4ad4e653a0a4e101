use std::sync::Arc;

use serde::Serialize;

use crate::errors::AppError;
use crate::pipeline::scoring::average_score;
use crate::store::ApplicationStore;

/// One card on the pipeline board: a candidate's application summarized
/// for `GET /positions/{id}/candidates`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineCandidate {
    pub full_name: String,
    /// Display NAME of the current interview step, not its id; the board
    /// matches cards to columns by this string.
    pub current_interview_step: String,
    pub average_score: f64,
    pub application_id: i32,
    pub candidate_id: i32,
}

/// Projects a position's applications into pipeline cards.
#[derive(Clone)]
pub struct PositionRoster {
    applications: Arc<dyn ApplicationStore>,
}

impl PositionRoster {
    pub fn new(applications: Arc<dyn ApplicationStore>) -> Self {
        Self { applications }
    }

    /// Every candidate applied to the position, with their current stage
    /// name and aggregated interview score. A position with no applications
    /// (or an unknown position id) yields an empty list.
    pub async fn candidates_for_position(
        &self,
        position_id: i32,
    ) -> Result<Vec<PipelineCandidate>, AppError> {
        let records = self.applications.list_by_position(position_id).await?;
        Ok(records
            .into_iter()
            .map(|record| PipelineCandidate {
                full_name: format!(
                    "{} {}",
                    record.candidate.first_name, record.candidate.last_name
                ),
                current_interview_step: record.current_step_name,
                average_score: average_score(&record.interviews),
                application_id: record.application.id,
                candidate_id: record.application.candidate_id,
            })
            .collect())
    }
}
