use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend rejected the transition with status {0}")]
    Rejected(StatusCode),
}

/// Seam between the board and whatever persists stage transitions.
/// Production uses [`HttpTransitionGateway`]; tests inject doubles.
#[async_trait]
pub trait TransitionGateway: Send + Sync {
    async fn persist_move(
        &self,
        candidate_id: i32,
        application_id: i32,
        new_step_id: i32,
    ) -> Result<(), GatewayError>;
}

/// Persists moves through `PUT /candidates/{id}` on the REST backend.
pub struct HttpTransitionGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransitionGateway {
    /// `base_url` without a trailing slash, e.g. `http://localhost:3010`.
    /// The client itself carries a bounded timeout so a stalled backend can
    /// never leave an optimistic move unreconciled forever.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl TransitionGateway for HttpTransitionGateway {
    async fn persist_move(
        &self,
        candidate_id: i32,
        application_id: i32,
        new_step_id: i32,
    ) -> Result<(), GatewayError> {
        let url = format!("{}/candidates/{candidate_id}", self.base_url);
        let response = self
            .http
            .put(&url)
            .json(&json!({
                "applicationId": application_id,
                "currentInterviewStep": new_step_id,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Rejected(response.status()));
        }
        Ok(())
    }
}
