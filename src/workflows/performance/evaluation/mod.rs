mod policy;
mod rules;

pub use policy::{coaching_plan, pip_goals};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::coaching::CoachingContext;
use super::domain::{
    Employee, EmployeeStatus, PerformanceMetric, RiskLevel, SystemSettings, TrendAnalysis,
    TrendDirection,
};

/// Stateless evaluator applying a settings snapshot to metric history.
///
/// Callers own every side effect: the evaluator never touches storage and
/// never mutates employee or plan state.
pub struct PipEvaluator {
    settings: SystemSettings,
}

/// Outcome of a PIP-candidacy evaluation for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipEvaluation {
    pub should_create_pip: bool,
    pub reason: String,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub consecutive_low_count: u32,
    pub average_score: f64,
    pub trend: TrendAnalysis,
}

/// Outcome of evaluating an in-flight plan against its improvement bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvaluation {
    pub should_terminate: bool,
    pub should_extend: bool,
    pub improvement_percent: f64,
    pub current_trend: TrendDirection,
    pub recommended_actions: Vec<String>,
    pub risk_level: RiskLevel,
}

impl PipEvaluator {
    pub fn new(settings: SystemSettings) -> Self {
        Self { settings }
    }

    /// Decide whether `employee` should be placed on a plan.
    ///
    /// Metric history may be unfiltered; rows for other employees are
    /// ignored. Ordering for the streak window is by `period` descending.
    pub fn evaluate_candidate(
        &self,
        employee: &Employee,
        metrics: &[PerformanceMetric],
    ) -> PipEvaluation {
        if self.settings.kill_switch_active {
            return PipEvaluation {
                should_create_pip: false,
                reason: "Kill switch is active - automated evaluations paused".to_string(),
                risk_level: RiskLevel::Low,
                recommendations: Vec::new(),
                consecutive_low_count: 0,
                average_score: 0.0,
                trend: TrendAnalysis::flat(),
            };
        }

        let mut sorted: Vec<&PerformanceMetric> = metrics
            .iter()
            .filter(|metric| metric.employee_id == employee.id)
            .collect();
        sorted.sort_by(|a, b| b.period.cmp(&a.period));

        if sorted.is_empty() {
            return PipEvaluation {
                should_create_pip: false,
                reason: "No performance metrics available".to_string(),
                risk_level: RiskLevel::Low,
                recommendations: vec!["Upload performance data for evaluation".to_string()],
                consecutive_low_count: 0,
                average_score: 0.0,
                trend: TrendAnalysis::flat(),
            };
        }

        if employee.status == EmployeeStatus::Pip {
            return PipEvaluation {
                should_create_pip: false,
                reason: "Employee already has an active PIP".to_string(),
                risk_level: RiskLevel::High,
                recommendations: vec![
                    "Monitor PIP progress".to_string(),
                    "Provide additional coaching".to_string(),
                ],
                consecutive_low_count: 0,
                average_score: sorted[0].score,
                trend: rules::trend(&sorted),
            };
        }

        if employee.status == EmployeeStatus::Terminated {
            return PipEvaluation {
                should_create_pip: false,
                reason: "Employee has been terminated".to_string(),
                risk_level: RiskLevel::Low,
                recommendations: Vec::new(),
                consecutive_low_count: 0,
                average_score: 0.0,
                trend: TrendAnalysis::flat(),
            };
        }

        let window_len = sorted
            .len()
            .min(self.settings.consecutive_low_periods as usize);
        let consecutive_low_count =
            rules::consecutive_low_count(&sorted[..window_len], self.settings.min_score_threshold);
        let average_score = rules::average_score(&sorted[..sorted.len().min(5)]);
        let trend = rules::trend(&sorted);

        let should_create_pip = consecutive_low_count >= self.settings.consecutive_low_periods;
        let risk_level = policy::candidate_risk(
            should_create_pip,
            consecutive_low_count,
            average_score,
            self.settings.min_score_threshold,
        );
        let recommendations = policy::candidate_recommendations(
            average_score,
            consecutive_low_count,
            &trend,
            self.settings.consecutive_low_periods,
        );
        let reason = policy::candidate_reason(
            should_create_pip,
            consecutive_low_count,
            self.settings.min_score_threshold,
        );

        PipEvaluation {
            should_create_pip,
            reason,
            risk_level,
            recommendations,
            consecutive_low_count,
            average_score,
            trend,
        }
    }

    /// Decide the outcome of a plan as of `today`.
    ///
    /// Only metrics dated inside the plan window count, ordered by calendar
    /// date descending.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate_progress(
        &self,
        employee: &Employee,
        metrics: &[PerformanceMetric],
        pip_start: NaiveDate,
        pip_end: NaiveDate,
        initial_score: f64,
        improvement_required: f64,
        today: NaiveDate,
    ) -> ProgressEvaluation {
        let mut sorted: Vec<&PerformanceMetric> = metrics
            .iter()
            .filter(|metric| metric.employee_id == employee.id)
            .filter(|metric| metric.date >= pip_start)
            .collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        if sorted.is_empty() {
            return ProgressEvaluation {
                should_terminate: false,
                should_extend: true,
                improvement_percent: 0.0,
                current_trend: TrendDirection::Stable,
                recommended_actions: vec![
                    "No performance data during PIP period - extend for monitoring".to_string(),
                ],
                risk_level: RiskLevel::High,
            };
        }

        let latest_score = sorted[0].score;
        let improvement_percent = (latest_score - initial_score) / initial_score * 100.0;
        let average_score = rules::average_score(&sorted);
        let trend = rules::trend(&sorted);
        let pip_ended = today >= pip_end;

        let mut should_terminate = false;
        let mut should_extend = false;
        let mut risk_level = RiskLevel::Medium;
        let mut recommended_actions = Vec::new();

        if pip_ended {
            if improvement_percent >= improvement_required
                && average_score >= self.settings.min_score_threshold
            {
                risk_level = RiskLevel::Low;
                recommended_actions
                    .push("PIP successfully completed - return to normal status".to_string());
            } else if improvement_percent < improvement_required / 2.0 {
                should_terminate = true;
                risk_level = RiskLevel::Critical;
                recommended_actions
                    .push("Insufficient improvement - recommend termination".to_string());
            } else {
                should_extend = true;
                risk_level = RiskLevel::High;
                recommended_actions
                    .push("Partial improvement shown - consider extension".to_string());
            }
        } else if improvement_percent >= improvement_required {
            risk_level = RiskLevel::Low;
            recommended_actions.push("On track for successful completion".to_string());
        } else if trend.direction == TrendDirection::Improving {
            recommended_actions.push("Showing improvement - continue monitoring".to_string());
        } else {
            risk_level = RiskLevel::High;
            recommended_actions.push("Limited progress - increase coaching frequency".to_string());
        }

        ProgressEvaluation {
            should_terminate,
            should_extend,
            improvement_percent,
            current_trend: trend.direction,
            recommended_actions,
            risk_level,
        }
    }

    /// Build the coaching-engine input for an employee from stored history.
    ///
    /// `current_score` comes from the caller (the score being coached on),
    /// everything else is derived from the metric history.
    pub fn coaching_context(
        &self,
        employee: &Employee,
        metrics: &[PerformanceMetric],
        current_score: f64,
    ) -> CoachingContext {
        let mut sorted: Vec<&PerformanceMetric> = metrics
            .iter()
            .filter(|metric| metric.employee_id == employee.id)
            .collect();
        sorted.sort_by(|a, b| b.period.cmp(&a.period));

        let window_len = sorted
            .len()
            .min(self.settings.consecutive_low_periods as usize);
        let consecutive_low_periods =
            rules::consecutive_low_count(&sorted[..window_len], self.settings.min_score_threshold);
        let average_score = if sorted.is_empty() {
            current_score
        } else {
            rules::average_score(&sorted[..sorted.len().min(5)])
        };

        CoachingContext {
            current_score,
            previous_score: sorted.first().map(|metric| metric.score),
            average_score,
            consecutive_low_periods,
            trend: rules::trend(&sorted).direction,
            pip_active: employee.status == EmployeeStatus::Pip,
            role_expectations: self.settings.min_score_threshold,
        }
    }
}
