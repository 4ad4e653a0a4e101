pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::candidates::handlers as candidate_handlers;
use crate::positions::handlers as position_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/positions", get(position_handlers::list_positions))
        .route(
            "/positions/:id/interviewflow",
            get(position_handlers::get_interview_flow),
        )
        .route(
            "/positions/:id/candidates",
            get(position_handlers::get_position_candidates),
        )
        .route("/candidates", post(candidate_handlers::add_candidate))
        .route(
            "/candidates/:id",
            get(candidate_handlers::get_candidate).put(candidate_handlers::update_candidate_stage),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::store::memory::MemoryStore;

    fn app() -> Router {
        let store = Arc::new(MemoryStore::with_seed_data());
        build_router(AppState::new(store.clone(), store.clone(), store))
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn put_json(uri: &str, body: Value) -> Request<Body> {
        Request::put(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_positions_returns_visible() {
        let response = app().oneshot(get_request("/positions")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let positions = body.as_array().unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0]["title"], "Senior Full-Stack Engineer");
        assert_eq!(positions[0]["isVisible"], true);
    }

    #[tokio::test]
    async fn test_interview_flow_shape_and_order() {
        let response = app()
            .oneshot(get_request("/positions/1/interviewflow"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["positionName"], "Senior Full-Stack Engineer");
        let steps = body["interviewFlow"]["interviewSteps"].as_array().unwrap();
        let names: Vec<&str> = steps.iter().map(|s| s["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec!["Initial Screening", "Technical Interview", "Manager Interview"]
        );
        assert_eq!(steps[0]["orderIndex"], 1);
        assert_eq!(steps[0]["interviewFlowId"], 1);
    }

    #[tokio::test]
    async fn test_interview_flow_missing_position_is_404() {
        let response = app()
            .oneshot(get_request("/positions/999/interviewflow"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_position_candidates_grouping() {
        let response = app()
            .oneshot(get_request("/positions/1/candidates"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let candidates = body.as_array().unwrap();
        assert_eq!(candidates.len(), 3);

        let in_stage = |name: &str| {
            candidates
                .iter()
                .filter(|c| c["currentInterviewStep"] == name)
                .count()
        };
        assert_eq!(in_stage("Technical Interview"), 2);
        assert_eq!(in_stage("Initial Screening"), 1);

        let john = candidates
            .iter()
            .find(|c| c["fullName"] == "John Doe")
            .unwrap();
        assert_eq!(john["averageScore"], 5.0);
        assert_eq!(john["candidateId"], 1);
        assert_eq!(john["applicationId"], 1);
    }

    #[tokio::test]
    async fn test_update_stage_happy_path() {
        let app = app();
        let response = app
            .clone()
            .oneshot(put_json(
                "/candidates/3",
                json!({"applicationId": 4, "currentInterviewStep": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["message"], "Candidate stage updated successfully");
        assert_eq!(body["data"]["currentInterviewStep"], 2);

        // The board now shows Carlos in Technical Interview.
        let response = app
            .oneshot(get_request("/positions/1/candidates"))
            .await
            .unwrap();
        let candidates = read_json(response).await;
        let carlos = candidates
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["fullName"] == "Carlos García")
            .cloned()
            .unwrap();
        assert_eq!(carlos["currentInterviewStep"], "Technical Interview");
    }

    #[tokio::test]
    async fn test_update_stage_accepts_numeric_strings() {
        let response = app()
            .oneshot(put_json(
                "/candidates/1",
                json!({"applicationId": "1", "currentInterviewStep": "2"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_stage_bad_body_is_400() {
        let response = app()
            .oneshot(put_json(
                "/candidates/1",
                json!({"applicationId": "one", "currentInterviewStep": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_update_stage_unknown_application_is_404() {
        let response = app()
            .oneshot(put_json(
                "/candidates/1",
                json!({"applicationId": 999, "currentInterviewStep": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_candidate_and_fetch() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_json(
                "/candidates",
                json!({
                    "firstName": "Alice",
                    "lastName": "Johnson",
                    "email": "alice.johnson@example.com"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let response = app
            .oneshot(get_request(&format!("/candidates/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let profile = read_json(response).await;
        assert_eq!(profile["email"], "alice.johnson@example.com");
    }

    #[tokio::test]
    async fn test_add_candidate_duplicate_email_is_400() {
        let response = app()
            .oneshot(post_json(
                "/candidates",
                json!({
                    "firstName": "John",
                    "lastName": "Doe",
                    "email": "john.doe@gmail.com"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "CONFLICT");
        assert_eq!(
            body["error"]["message"],
            "The email already exists in the database"
        );
    }

    #[tokio::test]
    async fn test_get_missing_candidate_is_404() {
        let response = app().oneshot(get_request("/candidates/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_path_id_is_400() {
        let response = app()
            .oneshot(get_request("/positions/abc/candidates"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
