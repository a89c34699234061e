use axum::body::Bytes;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{MockError, MockTracker, DEFAULT_MAX_RESULTS};
use crate::model::tracker::{
    CreatedIssue, IssueSearch, ProjectSearch, TransitionList, TransitionRequest,
};
use crate::tracker::http::API_PREFIX;

impl MockError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MockError::InvalidComponent | MockError::InvalidIssue => StatusCode::BAD_REQUEST,
            MockError::IssueNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub fn router(tracker: MockTracker) -> Router {
    let api = Router::new()
        .route("/project/search", get(project_search))
        .route("/project/:key/components", get(project_components))
        .route("/component", post(create_component))
        .route("/search", get(search_issues))
        .route(
            "/issue/:key/transitions",
            get(issue_transitions).post(apply_transition),
        )
        .route("/issue", post(create_issue));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn(log_request))
        .with_state(tracker)
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let resp = next.run(req).await;
    info!(%method, path = %path, status = resp.status().as_u16(), "request");
    resp
}

#[derive(Deserialize)]
struct ProjectQuery {
    #[serde(default)]
    query: String,
}

async fn project_search(
    State(tracker): State<MockTracker>,
    Query(params): Query<ProjectQuery>,
) -> Json<ProjectSearch> {
    Json(ProjectSearch {
        values: tracker.search_projects(&params.query),
    })
}

async fn project_components(
    State(tracker): State<MockTracker>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    Json(tracker.components(&key))
}

#[derive(Deserialize)]
struct ComponentPayload {
    project: Option<String>,
    name: Option<String>,
}

async fn create_component(
    State(tracker): State<MockTracker>,
    Json(payload): Json<ComponentPayload>,
) -> Result<impl IntoResponse, MockError> {
    let component =
        tracker.create_component(payload.project.as_deref(), payload.name.as_deref())?;
    Ok(Json(component))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    jql: String,
    #[serde(rename = "maxResults", default = "default_max_results")]
    max_results: usize,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

async fn search_issues(
    State(tracker): State<MockTracker>,
    Query(params): Query<SearchParams>,
) -> Json<IssueSearch> {
    Json(IssueSearch {
        issues: tracker.search_issues(&params.jql, params.max_results),
    })
}

async fn issue_transitions(
    State(tracker): State<MockTracker>,
    Path(key): Path<String>,
) -> Json<TransitionList> {
    Json(TransitionList {
        transitions: tracker.transitions(&key),
    })
}

// Any body is accepted; the requested id does not affect the outcome.
async fn apply_transition(
    State(tracker): State<MockTracker>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<StatusCode, MockError> {
    let requested = serde_json::from_slice::<TransitionRequest>(&body)
        .map(|r| r.transition.id)
        .unwrap_or_default();
    tracker.apply_transition(&key, &requested)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_issue(
    State(tracker): State<MockTracker>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<CreatedIssue>, MockError> {
    let key = tracker.create_issue(&payload)?;
    Ok(Json(CreatedIssue { key }))
}
