use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::super::flow::FlowError;
use super::repository::{SessionId, SessionStore, StoreError};
use super::service::{RecommenderService, RecommenderServiceError};

#[derive(Debug, Clone, Deserialize)]
pub struct RegionRequest {
    pub in_region: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub attribute: String,
    #[serde(default)]
    pub value: String,
}

/// Router builder exposing the questionnaire over JSON.
pub fn recommender_router<S>(service: Arc<RecommenderService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/questions", get(questions_handler::<S>))
        .route("/api/v1/self-check", get(self_check_handler::<S>))
        .route("/api/v1/sessions", post(start_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id",
            get(session_handler::<S>).delete(discard_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/region",
            post(region_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/answers",
            post(answer_handler::<S>),
        )
        .route("/api/v1/sessions/:session_id/back", post(back_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id/restart",
            post(restart_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/debug",
            get(debug_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn questions_handler<S>(
    State(service): State<Arc<RecommenderService<S>>>,
) -> Response
where
    S: SessionStore + 'static,
{
    (StatusCode::OK, Json(service.recommender().schema())).into_response()
}

pub(crate) async fn self_check_handler<S>(
    State(service): State<Arc<RecommenderService<S>>>,
) -> Response
where
    S: SessionStore + 'static,
{
    let results = service.self_check();
    let passed = results.iter().filter(|result| result.passed).count();
    let payload = json!({
        "passed": passed,
        "total": results.len(),
        "results": results,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn start_handler<S>(State(service): State<Arc<RecommenderService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    match service.start() {
        Ok(record) => (StatusCode::CREATED, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<S>(
    State(service): State<Arc<RecommenderService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    view_response(service.get(&SessionId(session_id)))
}

pub(crate) async fn discard_handler<S>(
    State(service): State<Arc<RecommenderService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.discard(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn region_handler<S>(
    State(service): State<Arc<RecommenderService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<RegionRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    view_response(service.confirm_region(&SessionId(session_id), request.in_region))
}

pub(crate) async fn answer_handler<S>(
    State(service): State<Arc<RecommenderService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    view_response(service.submit_answer(
        &SessionId(session_id),
        &request.attribute,
        &request.value,
    ))
}

pub(crate) async fn back_handler<S>(
    State(service): State<Arc<RecommenderService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    view_response(service.go_back(&SessionId(session_id)))
}

pub(crate) async fn restart_handler<S>(
    State(service): State<Arc<RecommenderService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    view_response(service.restart(&SessionId(session_id)))
}

pub(crate) async fn debug_handler<S>(
    State(service): State<Arc<RecommenderService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let record = match service.get(&id) {
        Ok(record) => record,
        Err(err) => return error_response(err),
    };
    let payload = json!({
        "session": record.view(),
        "evaluation": record.flow.explain(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

fn view_response(
    result: Result<super::repository::SessionRecord, RecommenderServiceError>,
) -> Response {
    match result {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: RecommenderServiceError) -> Response {
    let (status, kind) = match &err {
        RecommenderServiceError::Flow(FlowError::InvalidAnswer(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invalid_answer")
        }
        RecommenderServiceError::Flow(FlowError::Sequence(_)) => {
            (StatusCode::CONFLICT, "sequence")
        }
        RecommenderServiceError::Store(StoreError::NotFound) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        RecommenderServiceError::Store(StoreError::Conflict) => (StatusCode::CONFLICT, "conflict"),
        RecommenderServiceError::Store(StoreError::Unavailable(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "unavailable")
        }
    };

    let payload = json!({
        "error": err.to_string(),
        "kind": kind,
    });
    (status, Json(payload)).into_response()
}
