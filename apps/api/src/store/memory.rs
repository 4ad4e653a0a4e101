//! In-memory store backend.
//!
//! Serves two purposes: a `STORE_BACKEND=memory` demo mode that boots the
//! API without a database, and the test double behind every service and
//! router test. One `Mutex` guards the whole dataset; the lock is never
//! held across an await point.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

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

#[derive(Default)]
struct Inner {
    positions: Vec<PositionRow>,
    flows: Vec<InterviewFlowRow>,
    steps: Vec<InterviewStepRow>,
    candidates: Vec<CandidateRow>,
    educations: Vec<EducationRow>,
    work_experiences: Vec<WorkExperienceRow>,
    resumes: Vec<ResumeRow>,
    applications: Vec<ApplicationRow>,
    interviews: Vec<InterviewRow>,
    next_id: i32,
}

impl Inner {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1000,
                ..Inner::default()
            }),
        }
    }

    /// A store pre-populated with the standard demo dataset: two visible
    /// positions, a three-step development flow (with a real-world
    /// order-index tie on the last two steps), three candidates and their
    /// applications, and three scored screening interviews.
    pub fn with_seed_data() -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().expect("memory store poisoned");
            seed(&mut inner);
        }
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store poisoned")
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PositionStore for MemoryStore {
    async fn list_visible(&self) -> Result<Vec<PositionRow>, AppError> {
        let inner = self.lock();
        Ok(inner
            .positions
            .iter()
            .filter(|p| p.is_visible)
            .cloned()
            .collect())
    }

    async fn find_with_flow(&self, id: i32) -> Result<Option<PositionFlowRecord>, AppError> {
        let inner = self.lock();
        let Some(position) = inner.positions.iter().find(|p| p.id == id).cloned() else {
            return Ok(None);
        };
        let flow = inner
            .flows
            .iter()
            .find(|f| f.id == position.interview_flow_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "position {id} references missing interview flow"
                ))
            })?;
        let steps = inner
            .steps
            .iter()
            .filter(|s| s.interview_flow_id == flow.id)
            .cloned()
            .collect();
        Ok(Some(PositionFlowRecord {
            position,
            flow,
            steps,
        }))
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn list_by_position(
        &self,
        position_id: i32,
    ) -> Result<Vec<ApplicationPipelineRecord>, AppError> {
        let inner = self.lock();
        inner
            .applications
            .iter()
            .filter(|a| a.position_id == position_id)
            .map(|application| {
                let candidate = inner
                    .candidates
                    .iter()
                    .find(|c| c.id == application.candidate_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "application {} references missing candidate",
                            application.id
                        ))
                    })?;
                let current_step_name = inner
                    .steps
                    .iter()
                    .find(|s| s.id == application.current_interview_step)
                    .map(|s| s.name.clone())
                    .ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "application {} references missing step",
                            application.id
                        ))
                    })?;
                let interviews = inner
                    .interviews
                    .iter()
                    .filter(|i| i.application_id == application.id)
                    .cloned()
                    .collect();
                Ok(ApplicationPipelineRecord {
                    application: application.clone(),
                    candidate,
                    current_step_name,
                    interviews,
                })
            })
            .collect()
    }

    async fn find_for_candidate(
        &self,
        application_id: i32,
        candidate_id: i32,
    ) -> Result<Option<ApplicationRow>, AppError> {
        let inner = self.lock();
        Ok(inner
            .applications
            .iter()
            .find(|a| a.id == application_id && a.candidate_id == candidate_id)
            .cloned())
    }

    async fn update_current_step(
        &self,
        application_id: i32,
        step_id: i32,
    ) -> Result<ApplicationRow, AppError> {
        let mut inner = self.lock();
        let application = inner
            .applications
            .iter_mut()
            .find(|a| a.id == application_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        application.current_interview_step = step_id;
        Ok(application.clone())
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn insert(&self, new: &NewCandidate) -> Result<CandidateRow, AppError> {
        let mut inner = self.lock();
        if inner.candidates.iter().any(|c| c.email == new.email) {
            return Err(AppError::Conflict(
                "The email already exists in the database".to_string(),
            ));
        }

        let id = inner.allocate_id();
        let candidate = CandidateRow {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            address: new.address.clone(),
        };
        inner.candidates.push(candidate.clone());

        for education in &new.educations {
            let row_id = inner.allocate_id();
            inner.educations.push(EducationRow {
                id: row_id,
                candidate_id: id,
                institution: education.institution.clone(),
                title: education.title.clone(),
                start_date: education.start_date,
                end_date: education.end_date,
            });
        }
        for experience in &new.work_experiences {
            let row_id = inner.allocate_id();
            inner.work_experiences.push(WorkExperienceRow {
                id: row_id,
                candidate_id: id,
                company: experience.company.clone(),
                position: experience.position.clone(),
                description: experience.description.clone(),
                start_date: experience.start_date,
                end_date: experience.end_date,
            });
        }
        if let Some(resume) = &new.resume {
            let row_id = inner.allocate_id();
            inner.resumes.push(ResumeRow {
                id: row_id,
                candidate_id: id,
                file_path: resume.file_path.clone(),
                file_type: resume.file_type.clone(),
                upload_date: Utc::now(),
            });
        }

        Ok(candidate)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CandidateProfile>, AppError> {
        let inner = self.lock();
        let Some(candidate) = inner.candidates.iter().find(|c| c.id == id).cloned() else {
            return Ok(None);
        };
        Ok(Some(CandidateProfile {
            candidate,
            educations: inner
                .educations
                .iter()
                .filter(|e| e.candidate_id == id)
                .cloned()
                .collect(),
            work_experiences: inner
                .work_experiences
                .iter()
                .filter(|w| w.candidate_id == id)
                .cloned()
                .collect(),
            resumes: inner
                .resumes
                .iter()
                .filter(|r| r.candidate_id == id)
                .cloned()
                .collect(),
        }))
    }
}

fn position(id: i32, flow_id: i32, title: &str, description: &str) -> PositionRow {
    PositionRow {
        id,
        company_id: 1,
        interview_flow_id: flow_id,
        title: title.to_string(),
        description: Some(description.to_string()),
        status: "Open".to_string(),
        is_visible: true,
        location: Some("Remote".to_string()),
        job_description: None,
        requirements: None,
        responsibilities: None,
        salary_min: Some(50_000.0),
        salary_max: Some(80_000.0),
        employment_type: Some("Full-time".to_string()),
        benefits: None,
        company_description: None,
        application_deadline: NaiveDate::from_ymd_opt(2024, 12, 31),
        contact_info: Some("hr@lti.com".to_string()),
    }
}

fn seed(inner: &mut Inner) {
    inner.flows = vec![
        InterviewFlowRow {
            id: 1,
            description: Some("Standard development interview process".to_string()),
        },
        InterviewFlowRow {
            id: 2,
            description: Some("Data science interview process".to_string()),
        },
    ];

    // Steps 2 and 3 deliberately share order_index 2; the directory's
    // id tie-break keeps their order stable.
    inner.steps = vec![
        InterviewStepRow {
            id: 1,
            interview_flow_id: 1,
            interview_type_id: 1,
            name: "Initial Screening".to_string(),
            order_index: 1,
        },
        InterviewStepRow {
            id: 2,
            interview_flow_id: 1,
            interview_type_id: 2,
            name: "Technical Interview".to_string(),
            order_index: 2,
        },
        InterviewStepRow {
            id: 3,
            interview_flow_id: 1,
            interview_type_id: 3,
            name: "Manager Interview".to_string(),
            order_index: 2,
        },
    ];

    inner.positions = vec![
        position(1, 1, "Senior Full-Stack Engineer", "Develop and maintain software applications."),
        position(2, 2, "Data Scientist", "Analyze and interpret complex data."),
    ];

    inner.candidates = vec![
        CandidateRow {
            id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@gmail.com".to_string(),
            phone: Some("1234567890".to_string()),
            address: Some("123 Main St".to_string()),
        },
        CandidateRow {
            id: 2,
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: "jane.smith@gmail.com".to_string(),
            phone: Some("0987654321".to_string()),
            address: Some("456 Elm St".to_string()),
        },
        CandidateRow {
            id: 3,
            first_name: "Carlos".to_string(),
            last_name: "García".to_string(),
            email: "carlos.garcia@example.com".to_string(),
            phone: Some("1122334455".to_string()),
            address: Some("789 Pine St".to_string()),
        },
    ];

    let now = Utc::now();
    let application = |id, position_id, candidate_id, step| ApplicationRow {
        id,
        position_id,
        candidate_id,
        application_date: now,
        current_interview_step: step,
        notes: None,
    };
    inner.applications = vec![
        application(1, 1, 1, 2),
        application(2, 2, 1, 2),
        application(3, 1, 2, 2),
        application(4, 1, 3, 1),
    ];

    let interview = |id, application_id, score, notes: &str| InterviewRow {
        id,
        application_id,
        interview_step_id: 1,
        employee_id: 1,
        interview_date: now,
        result: Some("Passed".to_string()),
        score: Some(score),
        notes: Some(notes.to_string()),
    };
    inner.interviews = vec![
        interview(1, 1, 5, "Good technical skills"),
        interview(2, 2, 5, "Excellent data analysis skills"),
        interview(3, 3, 4, "Good technical skills"),
    ];
}
