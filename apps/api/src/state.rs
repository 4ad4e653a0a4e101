use std::sync::Arc;

use crate::pipeline::directory::StageDirectory;
use crate::pipeline::roster::PositionRoster;
use crate::pipeline::transition::StageTransitionService;
use crate::store::{ApplicationStore, CandidateStore, PositionStore};

/// Shared application state injected into all route handlers via Axum
/// extractors. Stores are trait objects constructed once at startup and
/// passed in, so tests can swap in the memory backend.
#[derive(Clone)]
pub struct AppState {
    pub candidates: Arc<dyn CandidateStore>,
    pub directory: StageDirectory,
    pub roster: PositionRoster,
    pub transitions: StageTransitionService,
}

impl AppState {
    pub fn new(
        positions: Arc<dyn PositionStore>,
        applications: Arc<dyn ApplicationStore>,
        candidates: Arc<dyn CandidateStore>,
    ) -> Self {
        Self {
            candidates,
            directory: StageDirectory::new(positions.clone()),
            roster: PositionRoster::new(applications.clone()),
            transitions: StageTransitionService::new(applications, positions),
        }
    }
}
