use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::workflows::performance::domain::{
    Employee, EmployeeId, EmployeeStatus, PerformanceMetric, Pip, PipId, Principal, PrincipalRole,
    SystemSettings,
};
use crate::workflows::performance::evaluation::PipEvaluator;
use crate::workflows::performance::lifecycle::PipState;
use crate::workflows::performance::repository::{
    ArtifactError, ArtifactPublisher, InMemoryArtifacts, InMemoryRepository, TerminationArtifact,
    WorkforceRepository,
};
use crate::workflows::performance::service::PerformanceService;
use crate::workflows::performance::termination::{TerminationGate, TerminationRequest};

pub(super) fn settings() -> SystemSettings {
    SystemSettings {
        kill_switch_active: false,
        min_score_threshold: 70.0,
        min_utilization_threshold: 60.0,
        consecutive_low_periods: 3,
        default_grace_period: 21,
        min_improvement_percent: 10.0,
    }
}

pub(super) fn anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date")
}

pub(super) fn employee(id: &str, status: EmployeeStatus) -> Employee {
    Employee {
        id: EmployeeId(id.to_string()),
        name: format!("Employee {id}"),
        email: None,
        department: Some("Operations".to_string()),
        role: Some("Analyst".to_string()),
        manager_id: None,
        status,
    }
}

/// Build metrics most-recent-first: the first score gets the highest period
/// and the latest date, each older entry steps back one period and 7 days.
pub(super) fn scored_metrics(id: &str, scores_most_recent_first: &[f64]) -> Vec<PerformanceMetric> {
    let total = scores_most_recent_first.len();
    scored_metrics_from(id, scores_most_recent_first, anchor_date(), total as u32)
}

pub(super) fn scored_metrics_from(
    id: &str,
    scores_most_recent_first: &[f64],
    latest_date: NaiveDate,
    latest_period: u32,
) -> Vec<PerformanceMetric> {
    scores_most_recent_first
        .iter()
        .enumerate()
        .map(|(index, score)| PerformanceMetric {
            employee_id: EmployeeId(id.to_string()),
            period: latest_period - index as u32,
            score: *score,
            utilization: 75.0,
            tasks_completed: 10,
            date: latest_date - Duration::days(7 * index as i64),
        })
        .collect()
}

pub(super) fn evaluator() -> PipEvaluator {
    PipEvaluator::new(settings())
}

pub(super) fn evaluator_with(settings: SystemSettings) -> PipEvaluator {
    PipEvaluator::new(settings)
}

pub(super) fn principal(role: PrincipalRole) -> Principal {
    Principal {
        id: "ops@local".to_string(),
        role,
    }
}

pub(super) fn signed_request() -> TerminationRequest {
    TerminationRequest {
        legal_signoff: true,
        hr_signoff: true,
        risk_flags: Vec::new(),
    }
}

pub(super) type TestService = PerformanceService<InMemoryRepository, InMemoryArtifacts>;

pub(super) fn build_service() -> (TestService, Arc<InMemoryRepository>, Arc<InMemoryArtifacts>) {
    build_service_with_gate(TerminationGate::new(false))
}

pub(super) fn build_service_with_gate(
    gate: TerminationGate,
) -> (TestService, Arc<InMemoryRepository>, Arc<InMemoryArtifacts>) {
    let repository = Arc::new(InMemoryRepository::default());
    let artifacts = Arc::new(InMemoryArtifacts::default());
    let service = PerformanceService::new(repository.clone(), artifacts.clone(), gate);
    (service, repository, artifacts)
}

/// Seed an employee with metric history directly through the repository.
pub(super) fn seed_employee(
    repository: &InMemoryRepository,
    id: &str,
    status: EmployeeStatus,
    scores_most_recent_first: &[f64],
) {
    repository
        .insert_employee(employee(id, status))
        .expect("employee inserted");
    repository
        .append_metrics(scored_metrics(id, scores_most_recent_first))
        .expect("metrics appended");
}

/// Seed an employee already on a plan whose window ended before `today`.
#[allow(clippy::too_many_arguments)]
pub(super) fn seed_due_pip(
    repository: &InMemoryRepository,
    id: &str,
    pip_id: &str,
    initial_score: f64,
    in_window_scores_most_recent_first: &[f64],
    start: NaiveDate,
    end: NaiveDate,
) -> Pip {
    repository
        .insert_employee(employee(id, EmployeeStatus::Pip))
        .expect("employee inserted");
    let latest_in_window = end - Duration::days(1);
    repository
        .append_metrics(scored_metrics_from(
            id,
            in_window_scores_most_recent_first,
            latest_in_window,
            10,
        ))
        .expect("metrics appended");

    let pip = Pip {
        id: PipId(pip_id.to_string()),
        employee_id: EmployeeId(id.to_string()),
        status: PipState::Active,
        start_date: start,
        end_date: end,
        grace_period_days: 21,
        goals: vec!["Achieve and maintain 80% average performance score".to_string()],
        coaching_plan: "Weekly coaching sessions".to_string(),
        progress: 0.0,
        initial_score,
        current_score: None,
        improvement_required: 10.0,
    };
    repository.insert_pip(pip.clone()).expect("pip inserted");
    pip
}

/// Artifact sink that always fails, for exercising the log-first policy.
#[derive(Default)]
pub(super) struct FailingArtifacts;

impl ArtifactPublisher for FailingArtifacts {
    fn publish(&self, _artifact: TerminationArtifact) -> Result<(), ArtifactError> {
        Err(ArtifactError::Unavailable("document store offline".to_string()))
    }
}
