use std::sync::Arc;

use anyhow::anyhow;
use tracing::info;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::store::{ApplicationStore, PositionStore};

/// Backend authority for moving a candidate between interview stages.
#[derive(Clone)]
pub struct StageTransitionService {
    applications: Arc<dyn ApplicationStore>,
    positions: Arc<dyn PositionStore>,
}

impl StageTransitionService {
    pub fn new(applications: Arc<dyn ApplicationStore>, positions: Arc<dyn PositionStore>) -> Self {
        Self {
            applications,
            positions,
        }
    }

    /// Overwrites the application's current step and returns the persisted
    /// row. Idempotent: repeating the call with the same arguments yields
    /// the same state. Concurrent transitions of the same application race
    /// at the store; the write that commits last wins.
    ///
    /// The target step must belong to the interview flow of the
    /// application's position. The original system skipped this check and
    /// would happily point an application at a foreign flow's step; here it
    /// is rejected with a validation error.
    pub async fn transition(
        &self,
        candidate_id: i32,
        application_id: i32,
        new_step_id: i32,
    ) -> Result<ApplicationRow, AppError> {
        let application = self
            .applications
            .find_for_candidate(application_id, candidate_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        let record = self
            .positions
            .find_with_flow(application.position_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(anyhow!(
                    "application {application_id} references missing position {}",
                    application.position_id
                ))
            })?;

        if !record.steps.iter().any(|step| step.id == new_step_id) {
            return Err(AppError::Validation(format!(
                "Step {new_step_id} does not belong to the interview flow of position {}",
                application.position_id
            )));
        }

        let updated = self
            .applications
            .update_current_step(application_id, new_step_id)
            .await?;

        info!(
            application_id,
            candidate_id, new_step_id, "candidate stage updated"
        );
        Ok(updated)
    }
}
