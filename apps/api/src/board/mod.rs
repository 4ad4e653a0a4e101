//! Client-side pipeline board: the Kanban view where each column is an
//! interview stage and each card is a candidate's application. The board
//! is a pure in-memory model; `BoardSession` layers backend reconciliation
//! on top of it.

pub mod gateway;
pub mod session;

use std::time::Duration;

use thiserror::Error;

use crate::board::gateway::GatewayError;
use crate::pipeline::directory::InterviewFlowView;
use crate::pipeline::roster::PipelineCandidate;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("column index {0} is out of range")]
    ColumnOutOfRange(usize),

    #[error("row index {0} is out of range")]
    RowOutOfRange(usize),

    #[error("stage transition failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("stage transition timed out after {0:?}")]
    Timeout(Duration),
}

/// One candidate card.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardCard {
    pub candidate_id: i32,
    pub application_id: i32,
    pub name: String,
    pub rating: f64,
}

/// One stage column holding an ordered list of cards.
#[derive(Debug, Clone)]
pub struct BoardColumn {
    pub step_id: i32,
    pub title: String,
    pub cards: Vec<BoardCard>,
}

/// What to do with a candidate whose current stage name matches no column.
///
/// The original UI silently filtered such candidates off the board, which
/// may well have been a bug. Either way the mismatch is surfaced as a
/// [`ReconcileWarning`]; the policy only decides whether the card is kept
/// on a shelf beside the board or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedPolicy {
    Drop,
    Shelve,
}

/// A candidate that could not be placed on any column during assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileWarning {
    pub candidate_id: i32,
    pub application_id: i32,
    pub stage_name: String,
}

/// A move of one card between columns, in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardMove {
    pub source_column: usize,
    pub source_row: usize,
    pub dest_column: usize,
    pub dest_row: usize,
}

/// Proof of an applied move, holding everything needed both to persist it
/// (ids) and to undo it (the reverse splice).
#[derive(Debug, Clone)]
pub struct MoveReceipt {
    pub candidate_id: i32,
    pub application_id: i32,
    pub dest_step_id: i32,
    applied: CardMove,
}

#[derive(Debug, Clone)]
pub struct PipelineBoard {
    pub position_name: String,
    pub columns: Vec<BoardColumn>,
    /// Cards kept aside under `UnmatchedPolicy::Shelve`.
    pub shelf: Vec<BoardCard>,
}

impl PipelineBoard {
    /// Builds the board from the two independent fetches: the stage
    /// directory supplies the columns (order preserved), the roster
    /// supplies the cards, matched to columns by current stage NAME.
    /// Columns always exist before any card is placed.
    pub fn assemble(
        flow: &InterviewFlowView,
        roster: Vec<PipelineCandidate>,
        policy: UnmatchedPolicy,
    ) -> (Self, Vec<ReconcileWarning>) {
        let mut columns: Vec<BoardColumn> = flow
            .interview_flow
            .interview_steps
            .iter()
            .map(|step| BoardColumn {
                step_id: step.id,
                title: step.name.clone(),
                cards: Vec::new(),
            })
            .collect();

        let mut shelf = Vec::new();
        let mut warnings = Vec::new();

        for candidate in roster {
            let card = BoardCard {
                candidate_id: candidate.candidate_id,
                application_id: candidate.application_id,
                name: candidate.full_name,
                rating: candidate.average_score,
            };
            match columns
                .iter_mut()
                .find(|column| column.title == candidate.current_interview_step)
            {
                Some(column) => column.cards.push(card),
                None => {
                    warnings.push(ReconcileWarning {
                        candidate_id: card.candidate_id,
                        application_id: card.application_id,
                        stage_name: candidate.current_interview_step.clone(),
                    });
                    if policy == UnmatchedPolicy::Shelve {
                        shelf.push(card);
                    }
                }
            }
        }

        (
            Self {
                position_name: flow.position_name.clone(),
                columns,
                shelf,
            },
            warnings,
        )
    }

    /// Splices one card out of the source column and into the destination
    /// column. All other cards keep their relative order. Fails without
    /// modifying the board when any index is out of range.
    pub fn move_card(&mut self, mv: CardMove) -> Result<MoveReceipt, BoardError> {
        let column_count = self.columns.len();
        if mv.source_column >= column_count {
            return Err(BoardError::ColumnOutOfRange(mv.source_column));
        }
        if mv.dest_column >= column_count {
            return Err(BoardError::ColumnOutOfRange(mv.dest_column));
        }
        if mv.source_row >= self.columns[mv.source_column].cards.len() {
            return Err(BoardError::RowOutOfRange(mv.source_row));
        }

        let card = self.columns[mv.source_column].cards.remove(mv.source_row);

        if mv.dest_row > self.columns[mv.dest_column].cards.len() {
            // Put the card back before reporting; the board must be
            // unchanged on failure.
            self.columns[mv.source_column]
                .cards
                .insert(mv.source_row, card);
            return Err(BoardError::RowOutOfRange(mv.dest_row));
        }

        let candidate_id = card.candidate_id;
        let application_id = card.application_id;
        self.columns[mv.dest_column].cards.insert(mv.dest_row, card);

        Ok(MoveReceipt {
            candidate_id,
            application_id,
            dest_step_id: self.columns[mv.dest_column].step_id,
            applied: mv,
        })
    }

    /// Compensating action: reverses a move applied by [`move_card`],
    /// restoring the prior board state.
    ///
    /// [`move_card`]: PipelineBoard::move_card
    pub fn undo(&mut self, receipt: &MoveReceipt) -> Result<(), BoardError> {
        let reverse = CardMove {
            source_column: receipt.applied.dest_column,
            source_row: receipt.applied.dest_row,
            dest_column: receipt.applied.source_column,
            dest_row: receipt.applied.source_row,
        };
        self.move_card(reverse).map(|_| ())
    }
}
