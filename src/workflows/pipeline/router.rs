use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ActivityKind, Lead, LeadId, TaskId, TaskPriority};
use super::repository::{LeadRepository, RepositoryError};
use super::service::{PipelineService, PipelineServiceError};

/// Router builder exposing the pipeline over HTTP. This surface is
/// in-memory demo packaging around the pure engine, not a stable
/// protocol contract.
pub fn pipeline_router<R>(service: Arc<PipelineService<R>>) -> Router
where
    R: LeadRepository + 'static,
{
    Router::new()
        .route("/api/v1/pipeline/leads", post(add_lead_handler::<R>))
        .route("/api/v1/pipeline/leads/:lead_id", get(lead_handler::<R>))
        .route(
            "/api/v1/pipeline/leads/:lead_id/tasks",
            post(add_task_handler::<R>),
        )
        .route(
            "/api/v1/pipeline/leads/:lead_id/tasks/:task_id/complete",
            post(complete_task_handler::<R>),
        )
        .route(
            "/api/v1/pipeline/leads/:lead_id/follow-up",
            post(follow_up_handler::<R>),
        )
        .route(
            "/api/v1/pipeline/leads/:lead_id/activity",
            post(add_activity_handler::<R>),
        )
        .route("/api/v1/pipeline/board", get(board_handler::<R>))
        .route(
            "/api/v1/pipeline/agenda/upcoming",
            get(upcoming_handler::<R>),
        )
        .route(
            "/api/v1/pipeline/agenda/day/:date",
            get(day_handler::<R>),
        )
        .route(
            "/api/v1/pipeline/agenda/month/:year/:month",
            get(month_handler::<R>),
        )
        .with_state(service)
}

/// Clock override accepted by every read endpoint so responses can be
/// reproduced in tests and demos.
#[derive(Debug, Deserialize)]
pub(crate) struct ClockQuery {
    now: Option<NaiveDateTime>,
}

impl ClockQuery {
    fn resolve(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpcomingQuery {
    now: Option<NaiveDateTime>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddTaskRequest {
    description: String,
    priority: TaskPriority,
    due_date: Option<NaiveDateTime>,
    now: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FollowUpRequest {
    due: NaiveDateTime,
    kind: ActivityKind,
    #[serde(default)]
    notes: String,
    now: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddActivityRequest {
    content: String,
    kind: ActivityKind,
    author: String,
    now: Option<NaiveDateTime>,
}

fn current(now: Option<NaiveDateTime>) -> NaiveDateTime {
    now.unwrap_or_else(|| Local::now().naive_local())
}

pub(crate) async fn add_lead_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    axum::Json(lead): axum::Json<Lead>,
) -> Response
where
    R: LeadRepository + 'static,
{
    match service.add_lead(lead) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lead_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(lead_id): Path<String>,
    Query(clock): Query<ClockQuery>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let id = LeadId(lead_id);
    let now = clock.resolve();
    match service.lead(&id).and_then(|lead| {
        let score = service.lead_score(&id, now)?;
        Ok(json!({ "lead": lead, "score": score }))
    }) {
        Ok(payload) => (StatusCode::OK, axum::Json(payload)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn board_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Query(clock): Query<ClockQuery>,
) -> Response
where
    R: LeadRepository + 'static,
{
    match service.board(clock.resolve()) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn upcoming_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Query(query): Query<UpcomingQuery>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let now = current(query.now);
    match service.upcoming(now, query.limit) {
        Ok(events) => (StatusCode::OK, axum::Json(events)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn day_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(date): Path<String>,
    Query(clock): Query<ClockQuery>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let day = match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(day) => day,
        Err(err) => {
            let payload = json!({ "error": format!("invalid date '{date}': {err}") });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.agenda_for_day(day, clock.resolve()) {
        Ok(events) => (StatusCode::OK, axum::Json(events)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn month_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path((year, month)): Path<(i32, u32)>,
    Query(clock): Query<ClockQuery>,
) -> Response
where
    R: LeadRepository + 'static,
{
    match service.agenda_for_month(year, month, clock.resolve()) {
        Ok(events) => (StatusCode::OK, axum::Json(events)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_task_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(lead_id): Path<String>,
    axum::Json(request): axum::Json<AddTaskRequest>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let id = LeadId(lead_id);
    let now = current(request.now);
    match service.create_task(
        &id,
        &request.description,
        request.priority,
        request.due_date,
        now,
    ) {
        Ok(lead) => (StatusCode::OK, axum::Json(lead)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complete_task_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path((lead_id, task_id)): Path<(String, String)>,
    Query(clock): Query<ClockQuery>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let id = LeadId(lead_id);
    let task = TaskId(task_id);
    match service.complete_task(&id, &task, clock.resolve()) {
        Ok(lead) => (StatusCode::OK, axum::Json(lead)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn follow_up_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(lead_id): Path<String>,
    axum::Json(request): axum::Json<FollowUpRequest>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let id = LeadId(lead_id);
    let now = current(request.now);
    match service.schedule_follow_up(&id, request.due, request.kind, &request.notes, now) {
        Ok(lead) => (StatusCode::OK, axum::Json(lead)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_activity_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(lead_id): Path<String>,
    axum::Json(request): axum::Json<AddActivityRequest>,
) -> Response
where
    R: LeadRepository + 'static,
{
    let id = LeadId(lead_id);
    let now = current(request.now);
    match service.log_activity(&id, &request.content, request.kind, &request.author, now) {
        Ok(lead) => (StatusCode::OK, axum::Json(lead)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: PipelineServiceError) -> Response {
    let status = match &err {
        PipelineServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PipelineServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PipelineServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
