//! Storage seams — one repository trait per aggregate (Position,
//! Application, Candidate), carried in `AppState` as `Arc<dyn …>` so tests
//! can inject the in-memory backend without module-level mocking.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, InterviewRow};
use crate::models::candidate::{CandidateProfile, CandidateRow};
use crate::models::position::{InterviewFlowRow, InterviewStepRow, PositionRow};

/// A position joined with its interview flow and that flow's steps.
/// Step order is whatever the store returns; callers sort.
#[derive(Debug, Clone)]
pub struct PositionFlowRecord {
    pub position: PositionRow,
    pub flow: InterviewFlowRow,
    pub steps: Vec<InterviewStepRow>,
}

/// One application with everything the pipeline view needs: the candidate,
/// the name of the current step, and all interviews held so far.
#[derive(Debug, Clone)]
pub struct ApplicationPipelineRecord {
    pub application: ApplicationRow,
    pub candidate: CandidateRow,
    pub current_step_name: String,
    pub interviews: Vec<InterviewRow>,
}

#[derive(Debug, Clone)]
pub struct NewEducation {
    pub institution: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewWorkExperience {
    pub company: String,
    pub position: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub file_path: String,
    pub file_type: String,
}

/// A validated candidate ready for insertion, children included.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub educations: Vec<NewEducation>,
    pub work_experiences: Vec<NewWorkExperience>,
    pub resume: Option<NewResume>,
}

#[async_trait]
pub trait PositionStore: Send + Sync {
    /// All positions with the visibility flag set.
    async fn list_visible(&self) -> Result<Vec<PositionRow>, AppError>;

    /// The position plus its interview flow and steps, or `None` if the
    /// position does not exist.
    async fn find_with_flow(&self, id: i32) -> Result<Option<PositionFlowRecord>, AppError>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Every application for a position, joined for pipeline display.
    async fn list_by_position(
        &self,
        position_id: i32,
    ) -> Result<Vec<ApplicationPipelineRecord>, AppError>;

    /// The unique application matching (application id, candidate id).
    async fn find_for_candidate(
        &self,
        application_id: i32,
        candidate_id: i32,
    ) -> Result<Option<ApplicationRow>, AppError>;

    /// Overwrites `current_interview_step` on a single row by primary key
    /// and returns the updated row. Last write wins under concurrency.
    async fn update_current_step(
        &self,
        application_id: i32,
        step_id: i32,
    ) -> Result<ApplicationRow, AppError>;
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Inserts the candidate and all child records atomically.
    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn insert(&self, candidate: &NewCandidate) -> Result<CandidateRow, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<CandidateProfile>, AppError>;
}
