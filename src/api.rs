use std::net::SocketAddr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::error::TalentError;
use crate::model::{CandidatePatch, JobPatch, QuestionSpec};
use crate::query::JobQuery;
use crate::remote::RemoteEndpoint;

/// Shared state for the HTTP surface: everything goes through the
/// unreliable endpoint, so the API inherits its latency and fault policy.
#[derive(Clone)]
pub struct ApiState {
    pub remote: RemoteEndpoint,
}

#[derive(Deserialize)]
struct CreateJobRequest {
    title: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct ReorderRequest {
    #[serde(rename = "fromOrder")]
    from_order: u32,
    #[serde(rename = "toOrder")]
    to_order: u32,
}

#[derive(Deserialize)]
struct CreateCandidateRequest {
    name: String,
    email: String,
}

#[derive(Deserialize)]
struct PutAssessmentRequest {
    questions: Vec<QuestionSpec>,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/jobs", get(list_jobs_handler).post(create_job_handler))
        .route("/api/jobs/reorder", patch(reorder_jobs_handler))
        .route("/api/jobs/:id", patch(patch_job_handler))
        .route(
            "/api/candidates",
            get(list_candidates_handler).post(create_candidate_handler),
        )
        .route("/api/candidates/:id", patch(patch_candidate_handler))
        .route(
            "/api/assessments/:job_id",
            get(get_assessment_handler).put(put_assessment_handler),
        )
        .route("/api/assessments/:job_id/submit", post(submit_assessment_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve the API until the shutdown token fires.
pub async fn run_api(addr: SocketAddr, state: ApiState, shutdown: CancellationToken) {
    let app = router(state);

    tracing::info!(addr = %addr, "Starting API server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind API server");
            return;
        }
    };

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await });
    if let Err(e) = serve.await {
        tracing::error!(error = %e, "API server failed");
    }
}

/// Map a domain error to the HTTP status the original backend used.
fn failure(err: TalentError) -> (StatusCode, Json<Value>) {
    let status = match err {
        TalentError::InvalidMove { .. } | TalentError::Validation(_) => StatusCode::BAD_REQUEST,
        TalentError::NotFound { .. } => StatusCode::NOT_FOUND,
        TalentError::TransientFailure | TalentError::Network(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": err.to_string() })))
}

async fn index_handler() -> Html<&'static str> {
    Html(
        "<!doctype html><title>TalentFlow</title>\
         <h1>TalentFlow API</h1>\
         <p>Endpoints live under <code>/api</code>: jobs, candidates, assessments.</p>",
    )
}

async fn list_jobs_handler(
    State(state): State<ApiState>,
    Query(query): Query<JobQuery>,
) -> impl IntoResponse {
    match state.remote.list_jobs(&query).await {
        Ok(page) => (
            StatusCode::OK,
            Json(json!({ "jobs": page.items, "total": page.total })),
        ),
        Err(err) => failure(err),
    }
}

async fn create_job_handler(
    State(state): State<ApiState>,
    Json(req): Json<CreateJobRequest>,
) -> impl IntoResponse {
    match state.remote.create_job(req.title, req.tags).await {
        Ok(job) => (StatusCode::OK, Json(json!({ "job": job }))),
        Err(err) => failure(err),
    }
}

async fn reorder_jobs_handler(
    State(state): State<ApiState>,
    Json(req): Json<ReorderRequest>,
) -> impl IntoResponse {
    match state.remote.move_job(req.from_order, req.to_order).await {
        Ok(jobs) => (StatusCode::OK, Json(json!({ "jobs": jobs }))),
        Err(err) => failure(err),
    }
}

async fn patch_job_handler(
    State(state): State<ApiState>,
    Path(id): Path<u32>,
    Json(patch): Json<JobPatch>,
) -> impl IntoResponse {
    match state.remote.patch_job(id, &patch).await {
        Ok(job) => (StatusCode::OK, Json(json!({ "job": job }))),
        Err(err) => failure(err),
    }
}

async fn list_candidates_handler(State(state): State<ApiState>) -> impl IntoResponse {
    match state.remote.list_candidates().await {
        Ok(candidates) => (StatusCode::OK, Json(json!({ "candidates": candidates }))),
        Err(err) => failure(err),
    }
}

async fn create_candidate_handler(
    State(state): State<ApiState>,
    Json(req): Json<CreateCandidateRequest>,
) -> impl IntoResponse {
    match state.remote.create_candidate(req.name, req.email).await {
        Ok(candidate) => (StatusCode::OK, Json(json!({ "candidate": candidate }))),
        Err(err) => failure(err),
    }
}

async fn patch_candidate_handler(
    State(state): State<ApiState>,
    Path(id): Path<u32>,
    Json(patch): Json<CandidatePatch>,
) -> impl IntoResponse {
    match state.remote.patch_candidate(id, &patch).await {
        Ok(candidate) => (StatusCode::OK, Json(json!({ "candidate": candidate }))),
        Err(err) => failure(err),
    }
}

async fn get_assessment_handler(
    State(state): State<ApiState>,
    Path(job_id): Path<u32>,
) -> impl IntoResponse {
    match state.remote.get_assessment(job_id).await {
        Ok(assessment) => (StatusCode::OK, Json(json!({ "assessment": assessment }))),
        Err(err) => failure(err),
    }
}

async fn put_assessment_handler(
    State(state): State<ApiState>,
    Path(job_id): Path<u32>,
    Json(req): Json<PutAssessmentRequest>,
) -> impl IntoResponse {
    match state.remote.put_assessment(job_id, req.questions).await {
        Ok(assessment) => (StatusCode::OK, Json(json!({ "assessment": assessment }))),
        Err(err) => failure(err),
    }
}

async fn submit_assessment_handler(
    State(state): State<ApiState>,
    Path(job_id): Path<u32>,
    Json(answers): Json<Value>,
) -> impl IntoResponse {
    match state.remote.submit_assessment(job_id, answers).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Submission received (not stored)" })),
        ),
        Err(err) => failure(err),
    }
}
