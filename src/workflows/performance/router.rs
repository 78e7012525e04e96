use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    Employee, EmployeeId, PerformanceMetric, PipId, Principal, PrincipalRole, SettingsPatch,
};
use super::ingest::IngestError;
use super::repository::{ArtifactPublisher, RepositoryError, WorkforceRepository};
use super::service::{CoachingRequest, PerformanceService, PerformanceServiceError};
use super::termination::{TerminationPolicyError, TerminationRequest};

/// Router builder exposing the performance workflow over HTTP.
pub fn performance_router<R, A>(service: Arc<PerformanceService<R, A>>) -> Router
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/performance/employees",
            get(list_employees_handler::<R, A>).post(create_employee_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/employees/:employee_id",
            get(employee_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/employees/:employee_id/metrics",
            get(employee_metrics_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/employees/:employee_id/coaching",
            get(coaching_sessions_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/employees/:employee_id/pips",
            get(employee_pips_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/metrics",
            post(record_metric_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/metrics/import",
            post(import_metrics_handler::<R, A>),
        )
        .route("/api/v1/performance/pips", get(open_pips_handler::<R, A>))
        .route(
            "/api/v1/performance/pips/:pip_id/evaluate",
            post(pip_progress_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/evaluations/pips",
            post(pip_sweep_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/evaluations/terminations",
            post(termination_sweep_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/coaching",
            post(generate_coaching_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/settings",
            get(settings_handler::<R, A>).put(update_settings_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/audit-log",
            get(audit_log_handler::<R, A>),
        )
        .route(
            "/api/v1/performance/terminated",
            get(terminated_handler::<R, A>),
        )
        .with_state(service)
}

/// Demo principal extraction from headers; swap for JWT/OAuth in production.
fn principal_from_headers(headers: &HeaderMap) -> Principal {
    let id = headers
        .get("x-demo-user")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("demo@local")
        .to_string();
    let role = headers
        .get("x-demo-role")
        .and_then(|value| value.to_str().ok())
        .map(PrincipalRole::parse)
        .unwrap_or(PrincipalRole::Viewer);
    Principal { id, role }
}

fn error_response(error: PerformanceServiceError) -> Response {
    let status = match &error {
        PerformanceServiceError::Policy(TerminationPolicyError::Forbidden(_)) => {
            StatusCode::FORBIDDEN
        }
        PerformanceServiceError::Policy(_) | PerformanceServiceError::Transition(_) => {
            StatusCode::CONFLICT
        }
        PerformanceServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PerformanceServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PerformanceServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        PerformanceServiceError::Ingest(IngestError::Csv(_))
        | PerformanceServiceError::Ingest(IngestError::InvalidRow { .. })
        | PerformanceServiceError::Validation(_) => StatusCode::BAD_REQUEST,
    };

    let payload = match &error {
        PerformanceServiceError::Policy(TerminationPolicyError::MissingSignoff(missing)) => {
            json!({ "error": error.to_string(), "missing": missing })
        }
        PerformanceServiceError::Policy(TerminationPolicyError::RiskHold(flags)) => {
            json!({ "error": error.to_string(), "risk_flags": flags })
        }
        PerformanceServiceError::Transition(transition) => json!({
            "error": error.to_string(),
            "from": transition.from.label(),
            "to": transition.to.label(),
        }),
        other => json!({ "error": other.to_string() }),
    };

    (status, Json(payload)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SweepRequest {
    /// Evaluation date override; defaults to the local calendar date.
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TerminationSweepRequest {
    #[serde(default)]
    pub(crate) legal_signoff: bool,
    #[serde(default)]
    pub(crate) hr_signoff: bool,
    #[serde(default)]
    pub(crate) risk_flags: Vec<String>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

fn resolve_today(requested: Option<NaiveDate>) -> NaiveDate {
    requested.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) async fn list_employees_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.employees() {
        Ok(employees) => (StatusCode::OK, Json(employees)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_employee_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    Json(employee): Json<Employee>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.create_employee(employee) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn employee_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.employee(&EmployeeId(employee_id)) {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn employee_metrics_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.metrics_for(&EmployeeId(employee_id)) {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn coaching_sessions_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.coaching_sessions_for(&EmployeeId(employee_id)) {
        Ok(sessions) => (StatusCode::OK, Json(sessions)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn employee_pips_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.pips_for(&EmployeeId(employee_id)) {
        Ok(pips) => (StatusCode::OK, Json(pips)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_metric_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    Json(metric): Json<PerformanceMetric>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.record_metric(metric) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn import_metrics_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    body: String,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    let today = resolve_today(None);
    match service.import_metrics(body.as_bytes(), today) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn open_pips_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.open_pips() {
        Ok(pips) => (StatusCode::OK, Json(pips)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pip_progress_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    Path(pip_id): Path<String>,
    payload: Option<Json<SweepRequest>>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    let today = resolve_today(payload.and_then(|Json(request)| request.today));
    match service.evaluate_pip_progress(&PipId(pip_id), today) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pip_sweep_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    payload: Option<Json<SweepRequest>>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    let today = resolve_today(payload.and_then(|Json(request)| request.today));
    match service.evaluate_pip_candidates(today) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn termination_sweep_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    headers: HeaderMap,
    payload: Option<Json<TerminationSweepRequest>>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    let principal = principal_from_headers(&headers);
    let request = payload.map(|Json(body)| body).unwrap_or_default();
    let today = resolve_today(request.today);
    let termination_request = TerminationRequest {
        legal_signoff: request.legal_signoff,
        hr_signoff: request.hr_signoff,
        risk_flags: request.risk_flags,
    };

    match service.evaluate_terminations(&principal, &termination_request, today) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn generate_coaching_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    Json(request): Json<CoachingRequest>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    let today = resolve_today(None);
    match service.generate_coaching(request, today) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn settings_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.settings() {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_settings_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
    headers: HeaderMap,
    Json(patch): Json<SettingsPatch>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    let principal = principal_from_headers(&headers);
    match service.update_settings(patch, Some(&principal)) {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn audit_log_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.audit_entries() {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn terminated_handler<R, A>(
    State(service): State<Arc<PerformanceService<R, A>>>,
) -> Response
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    match service.terminated_employees() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}
