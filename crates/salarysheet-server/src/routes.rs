//! HTTP routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::error;

use salarysheet_core::SalaryResult;

use crate::process::{ProcessError, Processor};

const SUCCESS_MESSAGE: &str = "Employee salary processing complete";
const FAILURE_MESSAGE: &str = "An error occurred while processing employee salaries";

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<Processor>,
}

impl AppState {
    pub fn new(processor: Processor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }
}

/// Body of a successful `/process` call.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub message: &'static str,
    pub salaries: Vec<SalaryResult>,
}

impl ProcessResponse {
    pub fn new(salaries: Vec<SalaryResult>) -> Self {
        Self {
            message: SUCCESS_MESSAGE,
            salaries,
        }
    }
}

/// Body of a failed `/process` call.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoData => StatusCode::NOT_FOUND,
            Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            Self::NoData => ErrorResponse {
                message: self.to_string(),
                error: None,
            },
            Self::Provider(e) => ErrorResponse {
                message: FAILURE_MESSAGE.to_string(),
                error: Some(e.to_string()),
            },
        }
    }
}

impl IntoResponse for ProcessError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/process", get(process_salaries))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn process_salaries(
    State(state): State<AppState>,
) -> Result<Json<ProcessResponse>, ProcessError> {
    match state.processor.run().await {
        Ok(report) => Ok(Json(ProcessResponse::new(report.results))),
        Err(e) => {
            if let ProcessError::Provider(ref inner) = e {
                error!(error = %inner, "error in /process route");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use crate::process::tests::{FakeSalaries, FakeStore, employee};

    async fn call(store: FakeStore, salaries: FakeSalaries) -> (StatusCode, Value) {
        let state = AppState::new(Processor::new(Arc::new(store), Arc::new(salaries)));
        let response = process_salaries(State(state)).await.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn success_returns_salaries() {
        let store = FakeStore::new(vec![employee("E1", "TRUE"), employee("E2", "FALSE")]);
        let salaries = FakeSalaries::new(&[("E1", json!(4200))]);

        let (status, body) = call(store, salaries).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "message": "Employee salary processing complete",
                "salaries": [{
                    "id": "E1",
                    "name": "Name E1",
                    "position": "Engineer",
                    "isActive": "TRUE",
                    "salary": 4200
                }]
            })
        );
    }

    #[tokio::test]
    async fn degraded_rows_are_still_200() {
        let store = FakeStore::new(vec![employee("E1", "TRUE"), employee("E2", "TRUE")]);
        let salaries = FakeSalaries::new(&[("E2", json!("900"))]);

        let (status, body) = call(store, salaries).await;

        assert_eq!(status, StatusCode::OK);
        let rows = body["salaries"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["salary"], json!("0"));
        assert!(!rows[0]["error"].as_str().unwrap().is_empty());
        assert_eq!(rows[1]["salary"], json!("900"));
        assert!(rows[1].get("error").is_none());
    }

    #[tokio::test]
    async fn empty_sheet_is_404() {
        let (status, body) = call(FakeStore::new(vec![]), FakeSalaries::new(&[])).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"message": "No employee data found in the Google Sheet."})
        );
    }

    #[tokio::test]
    async fn auth_failure_is_500_with_message() {
        let mut salaries = FakeSalaries::new(&[("E1", json!(1))]);
        salaries.fail_token = true;

        let (status, body) = call(FakeStore::new(vec![employee("E1", "TRUE")]), salaries).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["message"],
            json!("An error occurred while processing employee salaries")
        );
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("authentication_failed"));
        assert!(error.contains("failed to refresh access token"));
    }

    #[tokio::test]
    async fn sheet_auth_failure_is_500() {
        let mut store = FakeStore::new(vec![employee("E1", "TRUE")]);
        store.fail_read = true;

        let (status, body) = call(store, FakeSalaries::new(&[])).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("[sheets]"));
    }

    #[test]
    fn router_builds() {
        let state = AppState::new(Processor::new(
            Arc::new(FakeStore::new(vec![])),
            Arc::new(FakeSalaries::new(&[])),
        ));
        let _ = router(state);
    }
}
