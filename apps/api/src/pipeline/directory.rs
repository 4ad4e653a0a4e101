use std::sync::Arc;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::position::{InterviewStepRow, PositionRow};
use crate::store::PositionStore;

/// Read-only projection of a position's interview flow, as served by
/// `GET /positions/{id}/interviewflow`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFlowView {
    pub position_name: String,
    pub interview_flow: InterviewFlowDetail,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFlowDetail {
    pub id: i32,
    pub description: Option<String>,
    pub interview_steps: Vec<InterviewStepRow>,
}

/// Read-only mapping from a position to its ordered list of stages.
#[derive(Clone)]
pub struct StageDirectory {
    positions: Arc<dyn PositionStore>,
}

impl StageDirectory {
    pub fn new(positions: Arc<dyn PositionStore>) -> Self {
        Self { positions }
    }

    pub async fn list_positions(&self) -> Result<Vec<PositionRow>, AppError> {
        self.positions.list_visible().await
    }

    /// The position's display name plus its stages in pipeline-column order.
    pub async fn interview_flow(&self, position_id: i32) -> Result<InterviewFlowView, AppError> {
        let record = self
            .positions
            .find_with_flow(position_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Position not found".to_string()))?;

        let mut steps = record.steps;
        sort_steps(&mut steps);

        Ok(InterviewFlowView {
            position_name: record.position.title,
            interview_flow: InterviewFlowDetail {
                id: record.flow.id,
                description: record.flow.description,
                interview_steps: steps,
            },
        })
    }
}

/// Ascending by `order_index`. Fixture data contains duplicate indices, so
/// the step id breaks ties to keep column order deterministic across calls.
pub fn sort_steps(steps: &mut [InterviewStepRow]) {
    steps.sort_by_key(|step| (step.order_index, step.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn step(id: i32, name: &str, order_index: i32) -> InterviewStepRow {
        InterviewStepRow {
            id,
            interview_flow_id: 1,
            interview_type_id: 1,
            name: name.to_string(),
            order_index,
        }
    }

    #[test]
    fn test_tied_order_index_breaks_by_id() {
        let mut steps = vec![step(3, "Manager", 2), step(2, "Technical", 2), step(1, "Screening", 1)];
        sort_steps(&mut steps);
        let ids: Vec<i32> = steps.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        // Same input in a different arrival order sorts identically.
        let mut shuffled = vec![step(2, "Technical", 2), step(1, "Screening", 1), step(3, "Manager", 2)];
        sort_steps(&mut shuffled);
        let shuffled_ids: Vec<i32> = shuffled.iter().map(|s| s.id).collect();
        assert_eq!(shuffled_ids, ids);
    }

    #[tokio::test]
    async fn test_interview_flow_for_seeded_position() {
        let directory = StageDirectory::new(Arc::new(MemoryStore::with_seed_data()));
        let view = directory.interview_flow(1).await.unwrap();

        assert_eq!(view.position_name, "Senior Full-Stack Engineer");
        let names: Vec<&str> = view
            .interview_flow
            .interview_steps
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Initial Screening", "Technical Interview", "Manager Interview"]
        );
    }

    #[tokio::test]
    async fn test_ordering_is_stable_across_calls() {
        let directory = StageDirectory::new(Arc::new(MemoryStore::with_seed_data()));
        let first = directory.interview_flow(1).await.unwrap();
        let second = directory.interview_flow(1).await.unwrap();
        let ids = |v: &InterviewFlowView| {
            v.interview_flow
                .interview_steps
                .iter()
                .map(|s| s.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn test_missing_position_is_not_found() {
        let directory = StageDirectory::new(Arc::new(MemoryStore::with_seed_data()));
        let err = directory.interview_flow(999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_positions_only_visible() {
        let directory = StageDirectory::new(Arc::new(MemoryStore::with_seed_data()));
        let positions = directory.list_positions().await.unwrap();
        assert_eq!(positions.len(), 2);
        assert!(positions.iter().all(|p| p.is_visible));
    }
}
