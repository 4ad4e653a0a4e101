use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::board::gateway::TransitionGateway;
use crate::board::{BoardError, CardMove, PipelineBoard};

/// A board bound to a transition gateway.
///
/// Moves are applied optimistically, then persisted. If the backend call
/// fails or exceeds the deadline, the move is rolled back so the board
/// never drifts from persisted state. Two rapid moves of the same card may
/// still race on the backend; the store's update-by-primary-key semantics
/// make the write that commits last authoritative (last write wins, not
/// last issued).
pub struct BoardSession {
    pub board: PipelineBoard,
    gateway: Arc<dyn TransitionGateway>,
    deadline: Duration,
}

impl BoardSession {
    pub fn new(board: PipelineBoard, gateway: Arc<dyn TransitionGateway>, deadline: Duration) -> Self {
        Self {
            board,
            gateway,
            deadline,
        }
    }

    /// Applies the move locally, persists it, and rolls back on failure.
    pub async fn move_candidate(&mut self, mv: CardMove) -> Result<(), BoardError> {
        let receipt = self.board.move_card(mv)?;

        let persist = self.gateway.persist_move(
            receipt.candidate_id,
            receipt.application_id,
            receipt.dest_step_id,
        );

        match tokio::time::timeout(self.deadline, persist).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                warn!(
                    candidate_id = receipt.candidate_id,
                    application_id = receipt.application_id,
                    "stage transition rejected, rolling back optimistic move: {e}"
                );
                self.board.undo(&receipt)?;
                Err(BoardError::Gateway(e))
            }
            Err(_) => {
                warn!(
                    candidate_id = receipt.candidate_id,
                    application_id = receipt.application_id,
                    "stage transition timed out, rolling back optimistic move"
                );
                self.board.undo(&receipt)?;
                Err(BoardError::Timeout(self.deadline))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    use crate::board::gateway::GatewayError;
    use crate::board::{BoardColumn, PipelineBoard};

    struct RecordingGateway {
        calls: Mutex<Vec<(i32, i32, i32)>>,
    }

    #[async_trait]
    impl TransitionGateway for RecordingGateway {
        async fn persist_move(
            &self,
            candidate_id: i32,
            application_id: i32,
            new_step_id: i32,
        ) -> Result<(), GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((candidate_id, application_id, new_step_id));
            Ok(())
        }
    }

    struct RejectingGateway;

    #[async_trait]
    impl TransitionGateway for RejectingGateway {
        async fn persist_move(&self, _: i32, _: i32, _: i32) -> Result<(), GatewayError> {
            Err(GatewayError::Rejected(StatusCode::NOT_FOUND))
        }
    }

    struct StalledGateway;

    #[async_trait]
    impl TransitionGateway for StalledGateway {
        async fn persist_move(&self, _: i32, _: i32, _: i32) -> Result<(), GatewayError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    fn board() -> PipelineBoard {
        let card = |candidate_id, name: &str| crate::board::BoardCard {
            candidate_id,
            application_id: candidate_id * 10,
            name: name.to_string(),
            rating: 4.0,
        };
        PipelineBoard {
            position_name: "Senior Full-Stack Engineer".to_string(),
            columns: vec![
                BoardColumn {
                    step_id: 1,
                    title: "Initial Screening".to_string(),
                    cards: vec![card(3, "Carlos García")],
                },
                BoardColumn {
                    step_id: 2,
                    title: "Technical Interview".to_string(),
                    cards: vec![card(1, "John Doe"), card(2, "Jane Smith")],
                },
            ],
            shelf: Vec::new(),
        }
    }

    fn move_first_card() -> CardMove {
        CardMove {
            source_column: 0,
            source_row: 0,
            dest_column: 1,
            dest_row: 0,
        }
    }

    #[tokio::test]
    async fn test_successful_move_persists_and_sticks() {
        let gateway = Arc::new(RecordingGateway {
            calls: Mutex::new(Vec::new()),
        });
        let mut session = BoardSession::new(board(), gateway.clone(), Duration::from_secs(5));

        session.move_candidate(move_first_card()).await.unwrap();

        assert!(session.board.columns[0].cards.is_empty());
        assert_eq!(session.board.columns[1].cards[0].candidate_id, 3);
        // The PUT carried the destination column's step id.
        assert_eq!(*gateway.calls.lock().unwrap(), vec![(3, 30, 2)]);
    }

    #[tokio::test]
    async fn test_rejected_move_rolls_back() {
        let mut session =
            BoardSession::new(board(), Arc::new(RejectingGateway), Duration::from_secs(5));

        let err = session.move_candidate(move_first_card()).await.unwrap_err();
        assert!(matches!(err, BoardError::Gateway(_)));

        // Board restored: Carlos is back in column 0.
        assert_eq!(session.board.columns[0].cards.len(), 1);
        assert_eq!(session.board.columns[0].cards[0].candidate_id, 3);
        assert_eq!(session.board.columns[1].cards.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_gateway_times_out_and_rolls_back() {
        let mut session =
            BoardSession::new(board(), Arc::new(StalledGateway), Duration::from_secs(10));

        let err = session.move_candidate(move_first_card()).await.unwrap_err();
        assert!(matches!(err, BoardError::Timeout(_)));
        assert_eq!(session.board.columns[0].cards.len(), 1);
    }
}
