use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::coaching::{CoachingEngine, CoachingRecommendation};
use super::domain::{
    AuditEntry, CoachingKind, CoachingSession, Employee, EmployeeId, EmployeeStatus,
    PerformanceMetric, Pip, PipId, Principal, RiskLevel, SettingsPatch, SystemSettings,
    TerminatedEmployee,
};
use super::evaluation::{coaching_plan, pip_goals, PipEvaluator, ProgressEvaluation};
use super::ingest::{self, IngestError};
use super::letters::termination_letter;
use super::lifecycle::{assert_transition, PipState, TransitionError};
use super::repository::{
    ArtifactPublisher, RepositoryError, TerminationArtifact, WorkforceRepository,
};
use super::termination::{TerminationGate, TerminationPolicyError, TerminationRequest};

static PIP_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static AUDIT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_pip_id() -> PipId {
    let id = PIP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PipId(format!("pip-{id:06}"))
}

fn next_session_id() -> String {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("coaching-{id:06}")
}

fn next_audit_id() -> String {
    let id = AUDIT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("audit-{id:06}")
}

/// Error raised by the performance workflow service.
#[derive(Debug, thiserror::Error)]
pub enum PerformanceServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Policy(#[from] TerminationPolicyError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("{0}")]
    Validation(String),
}

/// Wrapper distinguishing a kill-switch pause from a completed sweep. A
/// pause is a successful response meaning "no action taken", which is not
/// the same as "action taken, zero candidates found".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepOutcome<T> {
    Paused { message: String },
    Completed(T),
}

impl<T> SweepOutcome<T> {
    pub fn paused() -> Self {
        Self::Paused {
            message: "Kill switch is active. No automated actions will be taken.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipSweepReport {
    pub results: Vec<PipSweepAction>,
    pub processed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PipSweepAction {
    PipCreated {
        employee_id: EmployeeId,
        pip_id: PipId,
        reason: String,
        risk_level: RiskLevel,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminationSweepReport {
    pub results: Vec<TerminationSweepEntry>,
    pub processed: usize,
}

/// Per-plan outcome of the termination sweep; failures are isolated so one
/// bad record never aborts the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TerminationSweepEntry {
    Terminated {
        employee_id: EmployeeId,
        pip_id: PipId,
        letter_hash: String,
    },
    PipCompleted {
        employee_id: EmployeeId,
        pip_id: PipId,
    },
    Extended {
        employee_id: EmployeeId,
        pip_id: PipId,
        new_end_date: NaiveDate,
    },
    Failed {
        employee_id: EmployeeId,
        pip_id: PipId,
        error: String,
    },
}

/// How a single progress evaluation was applied to the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum PipResolution {
    Terminated { letter_hash: String },
    Completed,
    Extended { new_end_date: NaiveDate },
    InProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipProgressReport {
    pub pip_id: PipId,
    pub employee_id: EmployeeId,
    pub evaluation: ProgressEvaluation,
    #[serde(flatten)]
    pub resolution: PipResolution,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoachingRequest {
    pub employee_id: String,
    pub score: f64,
    #[serde(default)]
    pub pip_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachingReport {
    pub session: CoachingSession,
    pub recommendation: CoachingRecommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsImportReport {
    pub metrics_created: usize,
    pub pip_evaluation: SweepOutcome<PipSweepReport>,
}

/// Service composing the repository, the evaluators, the lifecycle machine,
/// the termination gate, and the letter publisher.
pub struct PerformanceService<R, A> {
    repository: Arc<R>,
    artifacts: Arc<A>,
    gate: TerminationGate,
}

impl<R, A> PerformanceService<R, A>
where
    R: WorkforceRepository + 'static,
    A: ArtifactPublisher + 'static,
{
    pub fn new(repository: Arc<R>, artifacts: Arc<A>, gate: TerminationGate) -> Self {
        Self {
            repository,
            artifacts,
            gate,
        }
    }

    // ------------------------------------------------------------------
    // Directory passthroughs
    // ------------------------------------------------------------------

    pub fn employees(&self) -> Result<Vec<Employee>, PerformanceServiceError> {
        Ok(self.repository.employees()?)
    }

    pub fn employee(&self, id: &EmployeeId) -> Result<Employee, PerformanceServiceError> {
        Ok(self
            .repository
            .employee(id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    pub fn create_employee(&self, employee: Employee) -> Result<Employee, PerformanceServiceError> {
        if employee.id.0.trim().is_empty() {
            return Err(PerformanceServiceError::Validation(
                "employee id is required".to_string(),
            ));
        }
        let stored = self.repository.insert_employee(employee)?;
        self.audit(
            "employee_created",
            "employee",
            &stored.id.0,
            None,
            json!({ "name": stored.name, "status": stored.status.label() }),
        )?;
        Ok(stored)
    }

    pub fn metrics_for(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<PerformanceMetric>, PerformanceServiceError> {
        Ok(self.repository.metrics_for(employee_id)?)
    }

    pub fn open_pips(&self) -> Result<Vec<Pip>, PerformanceServiceError> {
        Ok(self.repository.open_pips()?)
    }

    pub fn pips_for(&self, employee_id: &EmployeeId) -> Result<Vec<Pip>, PerformanceServiceError> {
        Ok(self.repository.pips_for(employee_id)?)
    }

    pub fn coaching_sessions_for(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<CoachingSession>, PerformanceServiceError> {
        Ok(self.repository.coaching_sessions_for(employee_id)?)
    }

    pub fn audit_entries(&self) -> Result<Vec<AuditEntry>, PerformanceServiceError> {
        Ok(self.repository.audit_entries()?)
    }

    pub fn terminated_employees(
        &self,
    ) -> Result<Vec<TerminatedEmployee>, PerformanceServiceError> {
        Ok(self.repository.terminated_employees()?)
    }

    pub fn settings(&self) -> Result<SystemSettings, PerformanceServiceError> {
        Ok(self.repository.settings()?)
    }

    pub fn update_settings(
        &self,
        patch: SettingsPatch,
        actor: Option<&Principal>,
    ) -> Result<SystemSettings, PerformanceServiceError> {
        let updated = self.repository.update_settings(patch.clone())?;
        self.audit(
            "system_settings_updated",
            "system_settings",
            "system",
            actor,
            json!({ "updates": patch, "settings": updated }),
        )?;
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Metric ingestion
    // ------------------------------------------------------------------

    pub fn record_metric(
        &self,
        metric: PerformanceMetric,
    ) -> Result<PerformanceMetric, PerformanceServiceError> {
        if metric.employee_id.0.trim().is_empty() {
            return Err(PerformanceServiceError::Validation(
                "employee_id is required".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&metric.score) {
            return Err(PerformanceServiceError::Validation(format!(
                "score {} outside 0-100",
                metric.score
            )));
        }
        if !(0.0..=100.0).contains(&metric.utilization) {
            return Err(PerformanceServiceError::Validation(format!(
                "utilization {} outside 0-100",
                metric.utilization
            )));
        }

        self.repository.append_metrics(vec![metric.clone()])?;
        self.audit(
            "performance_metric_created",
            "performance_metric",
            &metric.employee_id.0,
            None,
            json!({ "period": metric.period, "score": metric.score }),
        )?;
        Ok(metric)
    }

    /// Ingest a CSV export and immediately run the PIP sweep over the new
    /// data, mirroring the upload-then-evaluate flow of the dashboard.
    pub fn import_metrics<Rd: Read>(
        &self,
        reader: Rd,
        today: NaiveDate,
    ) -> Result<MetricsImportReport, PerformanceServiceError> {
        let metrics = ingest::parse_metric_rows(reader)?;
        let metrics_created = self.repository.append_metrics(metrics)?;
        self.audit(
            "csv_uploaded",
            "performance_metrics",
            "bulk",
            None,
            json!({ "count": metrics_created }),
        )?;

        let pip_evaluation = self.evaluate_pip_candidates(today)?;
        Ok(MetricsImportReport {
            metrics_created,
            pip_evaluation,
        })
    }

    // ------------------------------------------------------------------
    // PIP sweep
    // ------------------------------------------------------------------

    /// Evaluate every non-terminated employee and open plans where the
    /// consecutive-low trigger fired.
    pub fn evaluate_pip_candidates(
        &self,
        today: NaiveDate,
    ) -> Result<SweepOutcome<PipSweepReport>, PerformanceServiceError> {
        let settings = self.repository.settings()?;
        if settings.kill_switch_active {
            return Ok(SweepOutcome::paused());
        }

        let evaluator = PipEvaluator::new(settings.clone());
        let employees = self.repository.employees()?;
        let processed = employees.len();
        let mut results = Vec::new();

        for employee in &employees {
            if employee.status == EmployeeStatus::Terminated {
                continue;
            }

            let metrics = self.repository.metrics_for(&employee.id)?;
            let evaluation = evaluator.evaluate_candidate(employee, &metrics);
            if !evaluation.should_create_pip {
                continue;
            }

            // Re-check the guard against fresh state immediately before the
            // write; a concurrent sweep may have opened a plan meanwhile.
            let current = self
                .repository
                .employee(&employee.id)?
                .ok_or(RepositoryError::NotFound)?;
            if current.status != EmployeeStatus::Active {
                continue;
            }

            assert_transition(PipState::Proposed, PipState::Active)?;

            let initial_score = latest_score_by_period(&metrics).unwrap_or(0.0);
            let pip = Pip {
                id: next_pip_id(),
                employee_id: employee.id.clone(),
                status: PipState::Active,
                start_date: today,
                end_date: today + Duration::days(i64::from(settings.default_grace_period)),
                grace_period_days: settings.default_grace_period,
                goals: pip_goals(evaluation.average_score, &settings),
                coaching_plan: coaching_plan(evaluation.average_score, &evaluation.trend),
                progress: 0.0,
                initial_score,
                current_score: None,
                improvement_required: settings.min_improvement_percent,
            };

            let stored = match self.repository.insert_pip(pip) {
                Ok(stored) => stored,
                // Lost the race to an existing open plan; the invariant held.
                Err(RepositoryError::Conflict) => continue,
                Err(other) => return Err(other.into()),
            };
            self.repository
                .update_employee_status(&employee.id, EmployeeStatus::Pip)?;

            self.audit(
                "pip_created_automatically",
                "pip",
                &stored.id.0,
                None,
                json!({
                    "employee_id": employee.id,
                    "reason": evaluation.reason,
                    "risk_level": evaluation.risk_level.label(),
                }),
            )?;

            tracing::info!(
                employee = %employee.id.0,
                pip = %stored.id.0,
                risk = evaluation.risk_level.label(),
                "improvement plan opened"
            );

            results.push(PipSweepAction::PipCreated {
                employee_id: employee.id.clone(),
                pip_id: stored.id,
                reason: evaluation.reason,
                risk_level: evaluation.risk_level,
            });
        }

        Ok(SweepOutcome::Completed(PipSweepReport { results, processed }))
    }

    // ------------------------------------------------------------------
    // Progress evaluation and the gated termination sweep
    // ------------------------------------------------------------------

    /// Evaluate one plan and apply the resulting transition.
    pub fn evaluate_pip_progress(
        &self,
        pip_id: &PipId,
        today: NaiveDate,
    ) -> Result<PipProgressReport, PerformanceServiceError> {
        let pip = self
            .repository
            .pip(pip_id)?
            .ok_or(RepositoryError::NotFound)?;
        let employee = self
            .repository
            .employee(&pip.employee_id)?
            .ok_or(RepositoryError::NotFound)?;
        let settings = self.repository.settings()?;

        let evaluator = PipEvaluator::new(settings);
        let metrics = self.repository.metrics_for(&pip.employee_id)?;
        let evaluation = evaluator.evaluate_progress(
            &employee,
            &metrics,
            pip.start_date,
            pip.end_date,
            pip.initial_score,
            pip.improvement_required,
            today,
        );

        let resolution = self.apply_progress(&pip, &employee, &metrics, &evaluation, None, today)?;

        Ok(PipProgressReport {
            pip_id: pip.id,
            employee_id: employee.id,
            evaluation,
            resolution,
        })
    }

    /// The gated entry point wrapping the termination sweep behind the
    /// policy checks. Policy rejections surface before any evaluation runs.
    pub fn evaluate_terminations(
        &self,
        principal: &Principal,
        request: &TerminationRequest,
        today: NaiveDate,
    ) -> Result<SweepOutcome<TerminationSweepReport>, PerformanceServiceError> {
        self.gate.authorize(principal, request)?;

        let settings = self.repository.settings()?;
        if settings.kill_switch_active {
            return Ok(SweepOutcome::paused());
        }

        let evaluator = PipEvaluator::new(settings);
        let due: Vec<Pip> = self
            .repository
            .open_pips()?
            .into_iter()
            .filter(|pip| today >= pip.end_date)
            .collect();
        let processed = due.len();
        let mut results = Vec::new();

        for pip in &due {
            match self.resolve_due_pip(&evaluator, pip, principal, today) {
                Ok(Some(entry)) => results.push(entry),
                Ok(None) => {}
                Err(err) => results.push(TerminationSweepEntry::Failed {
                    employee_id: pip.employee_id.clone(),
                    pip_id: pip.id.clone(),
                    error: err.to_string(),
                }),
            }
        }

        Ok(SweepOutcome::Completed(TerminationSweepReport {
            results,
            processed,
        }))
    }

    fn resolve_due_pip(
        &self,
        evaluator: &PipEvaluator,
        pip: &Pip,
        principal: &Principal,
        today: NaiveDate,
    ) -> Result<Option<TerminationSweepEntry>, PerformanceServiceError> {
        let employee = self
            .repository
            .employee(&pip.employee_id)?
            .ok_or(RepositoryError::NotFound)?;
        let metrics = self.repository.metrics_for(&pip.employee_id)?;
        let evaluation = evaluator.evaluate_progress(
            &employee,
            &metrics,
            pip.start_date,
            pip.end_date,
            pip.initial_score,
            pip.improvement_required,
            today,
        );

        let resolution =
            self.apply_progress(pip, &employee, &metrics, &evaluation, Some(principal), today)?;

        Ok(match resolution {
            PipResolution::Terminated { letter_hash } => Some(TerminationSweepEntry::Terminated {
                employee_id: employee.id,
                pip_id: pip.id.clone(),
                letter_hash,
            }),
            PipResolution::Completed => Some(TerminationSweepEntry::PipCompleted {
                employee_id: employee.id,
                pip_id: pip.id.clone(),
            }),
            PipResolution::Extended { new_end_date } => Some(TerminationSweepEntry::Extended {
                employee_id: employee.id,
                pip_id: pip.id.clone(),
                new_end_date,
            }),
            PipResolution::InProgress => None,
        })
    }

    /// Translate an evaluation into the FSM-gated mutation it calls for.
    /// `assert_transition` runs before every persisted status change; a
    /// rejection leaves the plan untouched.
    fn apply_progress(
        &self,
        pip: &Pip,
        employee: &Employee,
        metrics: &[PerformanceMetric],
        evaluation: &ProgressEvaluation,
        actor: Option<&Principal>,
        today: NaiveDate,
    ) -> Result<PipResolution, PerformanceServiceError> {
        let current_score = latest_score_in_window(metrics, pip.start_date);

        if evaluation.should_terminate {
            // Dry run blocks the irreversible branch on every path, not just
            // the gated sweep.
            if self.gate.dry_run() {
                return Err(TerminationPolicyError::DryRunEnabled.into());
            }
            let letter_hash =
                self.terminate_on_pip(pip, employee, metrics, evaluation, actor, today)?;
            return Ok(PipResolution::Terminated { letter_hash });
        }

        if evaluation.should_extend {
            assert_transition(pip.status, PipState::Extended)?;
            let new_end_date =
                pip.end_date + Duration::days(i64::from(pip.grace_period_days));
            let mut updated = pip.clone();
            updated.status = PipState::Extended;
            updated.end_date = new_end_date;
            updated.current_score = current_score.or(updated.current_score);
            updated.progress = improvement_progress(evaluation, pip.improvement_required);
            self.repository.update_pip(updated)?;
            self.audit(
                "pip_extended",
                "pip",
                &pip.id.0,
                actor,
                json!({
                    "employee_id": pip.employee_id,
                    "new_end_date": new_end_date,
                    "improvement_percent": evaluation.improvement_percent,
                }),
            )?;
            return Ok(PipResolution::Extended { new_end_date });
        }

        if today >= pip.end_date {
            // Plan ran its course and met the bar.
            assert_transition(pip.status, PipState::Completed)?;
            let mut updated = pip.clone();
            updated.status = PipState::Completed;
            updated.current_score = current_score.or(updated.current_score);
            updated.progress = 100.0;
            self.repository.update_pip(updated)?;
            self.repository
                .update_employee_status(&employee.id, EmployeeStatus::Active)?;
            self.audit(
                "pip_completed",
                "pip",
                &pip.id.0,
                actor,
                json!({
                    "employee_id": pip.employee_id,
                    "improvement_percent": evaluation.improvement_percent,
                }),
            )?;
            return Ok(PipResolution::Completed);
        }

        // Still in flight: refresh the running snapshot only.
        let mut updated = pip.clone();
        updated.current_score = current_score.or(updated.current_score);
        updated.progress = improvement_progress(evaluation, pip.improvement_required);
        self.repository.update_pip(updated)?;
        Ok(PipResolution::InProgress)
    }

    fn terminate_on_pip(
        &self,
        pip: &Pip,
        employee: &Employee,
        metrics: &[PerformanceMetric],
        evaluation: &ProgressEvaluation,
        actor: Option<&Principal>,
        today: NaiveDate,
    ) -> Result<String, PerformanceServiceError> {
        assert_transition(pip.status, PipState::Terminated)?;

        let latest = latest_metric_in_window(metrics, pip.start_date);
        let final_score = latest.map(|metric| metric.score);
        let final_utilization = latest.map(|metric| metric.utilization);

        let mut updated = pip.clone();
        updated.status = PipState::Terminated;
        updated.current_score = final_score.or(updated.current_score);
        self.repository.update_pip(updated)?;
        self.repository
            .update_employee_status(&employee.id, EmployeeStatus::Terminated)?;

        let reason = format!(
            "Improvement {:.2}% < {}% threshold",
            evaluation.improvement_percent, pip.improvement_required
        );
        let letter = termination_letter(
            employee,
            final_score,
            final_utilization,
            &[reason.clone()],
            today,
        );

        self.repository.record_termination(TerminatedEmployee {
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            termination_date: today,
            termination_reason: reason.clone(),
            termination_letter: letter.body.clone(),
            letter_hash: letter.content_hash.clone(),
            final_score,
            final_utilization,
        })?;

        // The audit entry is the authoritative record of the transition;
        // letter publication failing afterwards must not roll anything back.
        self.audit(
            "employee_terminated",
            "pip",
            &pip.id.0,
            actor,
            json!({
                "employee_id": employee.id,
                "reason": reason,
                "letter_hash": letter.content_hash,
            }),
        )?;

        if let Err(err) = self.artifacts.publish(TerminationArtifact {
            employee_id: employee.id.clone(),
            letter: letter.body,
            content_hash: letter.content_hash.clone(),
        }) {
            tracing::warn!(
                employee = %employee.id.0,
                error = %err,
                "termination letter publication failed"
            );
            self.audit(
                "termination_letter_failed",
                "employee",
                &employee.id.0,
                actor,
                json!({ "error": err.to_string() }),
            )?;
        }

        Ok(letter.content_hash)
    }

    // ------------------------------------------------------------------
    // Coaching
    // ------------------------------------------------------------------

    /// Generate structured coaching feedback and persist it as a session.
    pub fn generate_coaching(
        &self,
        request: CoachingRequest,
        today: NaiveDate,
    ) -> Result<CoachingReport, PerformanceServiceError> {
        if request.employee_id.trim().is_empty() {
            return Err(PerformanceServiceError::Validation(
                "employee_id is required".to_string(),
            ));
        }

        let employee_id = EmployeeId(request.employee_id);
        let employee = self
            .repository
            .employee(&employee_id)?
            .ok_or(RepositoryError::NotFound)?;
        if employee.status == EmployeeStatus::Terminated {
            return Err(PerformanceServiceError::Validation(
                "employee has been terminated".to_string(),
            ));
        }

        let settings = self.repository.settings()?;
        let metrics = self.repository.metrics_for(&employee_id)?;
        let evaluator = PipEvaluator::new(settings);
        let context = evaluator.coaching_context(&employee, &metrics, request.score);
        let recommendation = CoachingEngine::recommend(&context);

        let session = self.repository.insert_coaching_session(CoachingSession {
            id: next_session_id(),
            employee_id: employee_id.clone(),
            pip_id: request.pip_id.map(PipId),
            feedback: recommendation.feedback.clone(),
            kind: CoachingKind::Automated,
            score: Some(request.score),
            date: today,
        })?;

        self.audit(
            "coaching_generated",
            "coaching_session",
            &session.id,
            None,
            json!({
                "employee_id": employee_id,
                "priority": recommendation.priority,
                "category": recommendation.category,
            }),
        )?;

        Ok(CoachingReport {
            session,
            recommendation,
        })
    }

    fn audit(
        &self,
        action: &str,
        entity_type: &str,
        entity_id: &str,
        actor: Option<&Principal>,
        details: serde_json::Value,
    ) -> Result<(), PerformanceServiceError> {
        self.repository.record_audit(AuditEntry {
            id: next_audit_id(),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            actor: actor.map(|principal| principal.id.clone()),
            details,
            recorded_at: Utc::now(),
        })?;
        Ok(())
    }
}

fn latest_score_by_period(metrics: &[PerformanceMetric]) -> Option<f64> {
    metrics
        .iter()
        .max_by_key(|metric| metric.period)
        .map(|metric| metric.score)
}

fn latest_metric_in_window(
    metrics: &[PerformanceMetric],
    window_start: NaiveDate,
) -> Option<&PerformanceMetric> {
    metrics
        .iter()
        .filter(|metric| metric.date >= window_start)
        .max_by_key(|metric| metric.date)
}

fn latest_score_in_window(metrics: &[PerformanceMetric], window_start: NaiveDate) -> Option<f64> {
    latest_metric_in_window(metrics, window_start).map(|metric| metric.score)
}

fn improvement_progress(evaluation: &ProgressEvaluation, improvement_required: f64) -> f64 {
    if improvement_required <= 0.0 {
        return 100.0;
    }
    (evaluation.improvement_percent / improvement_required * 100.0).clamp(0.0, 100.0)
}
