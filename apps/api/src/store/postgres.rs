//! sqlx-backed implementations of the store traits.
//!
//! Queries are runtime `query_as` against the schema in `migrations/`;
//! every write targets a single row by primary key, so no locking beyond
//! per-statement atomicity is needed (candidate intake is the one
//! multi-row write and runs in a transaction).

use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, InterviewRow};
use crate::models::candidate::{
    CandidateProfile, CandidateRow, EducationRow, ResumeRow, WorkExperienceRow,
};
use crate::models::position::{InterviewFlowRow, InterviewStepRow, PositionRow};
use crate::store::{
    ApplicationPipelineRecord, ApplicationStore, CandidateStore, NewCandidate, PositionFlowRecord,
    PositionStore,
};

pub struct PgPositionStore {
    pool: PgPool,
}

impl PgPositionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PositionStore for PgPositionStore {
    async fn list_visible(&self) -> Result<Vec<PositionRow>, AppError> {
        let positions = sqlx::query_as::<_, PositionRow>(
            "SELECT * FROM position WHERE is_visible = TRUE ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(positions)
    }

    async fn find_with_flow(&self, id: i32) -> Result<Option<PositionFlowRecord>, AppError> {
        let position =
            sqlx::query_as::<_, PositionRow>("SELECT * FROM position WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(position) = position else {
            return Ok(None);
        };

        let flow = sqlx::query_as::<_, InterviewFlowRow>(
            "SELECT * FROM interview_flow WHERE id = $1",
        )
        .bind(position.interview_flow_id)
        .fetch_one(&self.pool)
        .await?;

        let steps = sqlx::query_as::<_, InterviewStepRow>(
            "SELECT * FROM interview_step WHERE interview_flow_id = $1",
        )
        .bind(flow.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PositionFlowRecord {
            position,
            flow,
            steps,
        }))
    }
}

pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn list_by_position(
        &self,
        position_id: i32,
    ) -> Result<Vec<ApplicationPipelineRecord>, AppError> {
        let applications = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM application WHERE position_id = $1 ORDER BY id",
        )
        .bind(position_id)
        .fetch_all(&self.pool)
        .await?;

        if applications.is_empty() {
            return Ok(Vec::new());
        }

        let application_ids: Vec<i32> = applications.iter().map(|a| a.id).collect();
        let candidate_ids: Vec<i32> = applications.iter().map(|a| a.candidate_id).collect();
        let step_ids: Vec<i32> = applications
            .iter()
            .map(|a| a.current_interview_step)
            .collect();

        let candidates: HashMap<i32, CandidateRow> =
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidate WHERE id = ANY($1)")
                .bind(&candidate_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();

        let steps: HashMap<i32, InterviewStepRow> = sqlx::query_as::<_, InterviewStepRow>(
            "SELECT * FROM interview_step WHERE id = ANY($1)",
        )
        .bind(&step_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

        let mut interviews_by_application: HashMap<i32, Vec<InterviewRow>> = HashMap::new();
        let interviews = sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interview WHERE application_id = ANY($1) ORDER BY id",
        )
        .bind(&application_ids)
        .fetch_all(&self.pool)
        .await?;
        for interview in interviews {
            interviews_by_application
                .entry(interview.application_id)
                .or_default()
                .push(interview);
        }

        applications
            .into_iter()
            .map(|application| {
                let candidate = candidates
                    .get(&application.candidate_id)
                    .cloned()
                    .ok_or_else(|| {
                        anyhow!("application {} references missing candidate", application.id)
                    })?;
                let current_step_name = steps
                    .get(&application.current_interview_step)
                    .map(|s| s.name.clone())
                    .ok_or_else(|| {
                        anyhow!("application {} references missing step", application.id)
                    })?;
                let interviews = interviews_by_application
                    .remove(&application.id)
                    .unwrap_or_default();
                Ok(ApplicationPipelineRecord {
                    application,
                    candidate,
                    current_step_name,
                    interviews,
                })
            })
            .collect::<Result<Vec<_>, anyhow::Error>>()
            .map_err(AppError::Internal)
    }

    async fn find_for_candidate(
        &self,
        application_id: i32,
        candidate_id: i32,
    ) -> Result<Option<ApplicationRow>, AppError> {
        let application = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM application WHERE id = $1 AND candidate_id = $2",
        )
        .bind(application_id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn update_current_step(
        &self,
        application_id: i32,
        step_id: i32,
    ) -> Result<ApplicationRow, AppError> {
        let application = sqlx::query_as::<_, ApplicationRow>(
            "UPDATE application SET current_interview_step = $2 WHERE id = $1 RETURNING *",
        )
        .bind(application_id)
        .bind(step_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }
}

pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn insert(&self, new: &NewCandidate) -> Result<CandidateRow, AppError> {
        let mut tx = self.pool.begin().await?;

        let candidate = sqlx::query_as::<_, CandidateRow>(
            "INSERT INTO candidate (first_name, last_name, email, phone, address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.address)
        .fetch_one(&mut *tx)
        .await
        .map_err(conflict_on_duplicate_email)?;

        for education in &new.educations {
            sqlx::query(
                "INSERT INTO education (candidate_id, institution, title, start_date, end_date) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(candidate.id)
            .bind(&education.institution)
            .bind(&education.title)
            .bind(education.start_date)
            .bind(education.end_date)
            .execute(&mut *tx)
            .await?;
        }

        for experience in &new.work_experiences {
            sqlx::query(
                "INSERT INTO work_experience \
                 (candidate_id, company, position, description, start_date, end_date) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(candidate.id)
            .bind(&experience.company)
            .bind(&experience.position)
            .bind(&experience.description)
            .bind(experience.start_date)
            .bind(experience.end_date)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(resume) = &new.resume {
            sqlx::query(
                "INSERT INTO resume (candidate_id, file_path, file_type, upload_date) \
                 VALUES ($1, $2, $3, NOW())",
            )
            .bind(candidate.id)
            .bind(&resume.file_path)
            .bind(&resume.file_type)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(candidate)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CandidateProfile>, AppError> {
        let candidate =
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidate WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let educations = sqlx::query_as::<_, EducationRow>(
            "SELECT * FROM education WHERE candidate_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let work_experiences = sqlx::query_as::<_, WorkExperienceRow>(
            "SELECT * FROM work_experience WHERE candidate_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let resumes = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resume WHERE candidate_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(CandidateProfile {
            candidate,
            educations,
            work_experiences,
            resumes,
        }))
    }
}

/// Postgres unique-violation (23505) on candidate insert means the email is
/// already taken; everything else stays a database error.
fn conflict_on_duplicate_email(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::Conflict("The email already exists in the database".to_string())
        }
        _ => AppError::Database(e),
    }
}
