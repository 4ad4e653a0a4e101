//! Candidate intake validation.
//!
//! Payloads are parsed into explicit schema types (unknown fields
//! rejected) and field-validated before anything reaches a store, so the
//! domain layer never sees a malformed candidate.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::store::{NewCandidate, NewEducation, NewResume, NewWorkExperience};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCandidateRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub educations: Vec<EducationInput>,
    #[serde(default)]
    pub work_experiences: Vec<WorkExperienceInput>,
    pub cv: Option<ResumeInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EducationInput {
    pub institution: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkExperienceInput {
    pub company: String,
    pub position: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResumeInput {
    pub file_path: String,
    pub file_type: String,
}

/// Parses and validates a raw JSON payload into an insertable candidate.
pub fn parse_candidate(payload: Value) -> Result<NewCandidate, AppError> {
    let request: CreateCandidateRequest = serde_json::from_value(payload)
        .map_err(|e| AppError::Validation(format!("Invalid candidate payload: {e}")))?;

    validate_name("firstName", &request.first_name)?;
    validate_name("lastName", &request.last_name)?;
    validate_email(&request.email)?;
    if let Some(phone) = &request.phone {
        validate_phone(phone)?;
    }
    if let Some(address) = &request.address {
        if address.len() > 100 {
            return Err(AppError::Validation("Invalid address".to_string()));
        }
    }
    for education in &request.educations {
        validate_text("institution", &education.institution, 100)?;
        validate_text("title", &education.title, 250)?;
    }
    for experience in &request.work_experiences {
        validate_text("company", &experience.company, 100)?;
        validate_text("position", &experience.position, 100)?;
    }

    Ok(NewCandidate {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        phone: request.phone,
        address: request.address,
        educations: request
            .educations
            .into_iter()
            .map(|e| NewEducation {
                institution: e.institution,
                title: e.title,
                start_date: e.start_date,
                end_date: e.end_date,
            })
            .collect(),
        work_experiences: request
            .work_experiences
            .into_iter()
            .map(|w| NewWorkExperience {
                company: w.company,
                position: w.position,
                description: w.description,
                start_date: w.start_date,
                end_date: w.end_date,
            })
            .collect(),
        resume: request.cv.map(|r| NewResume {
            file_path: r.file_path,
            file_type: r.file_type,
        }),
    })
}

/// Names: 2–100 characters, letters and spaces only (accents included).
fn validate_name(field: &str, value: &str) -> Result<(), AppError> {
    let length = value.chars().count();
    let well_formed = (2..=100).contains(&length)
        && value.chars().all(|c| c.is_alphabetic() || c == ' ');
    if well_formed {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid {field}")))
    }
}

fn validate_email(value: &str) -> Result<(), AppError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid email".to_string()))
    }
}

/// Phone numbers: digits only, 6–15 characters.
fn validate_phone(value: &str) -> Result<(), AppError> {
    let length = value.chars().count();
    if (6..=15).contains(&length) && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid phone".to_string()))
    }
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    let length = value.chars().count();
    if length == 0 || length > max {
        return Err(AppError::Validation(format!("Invalid {field}")));
    }
    Ok(())
}
