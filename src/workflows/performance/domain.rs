use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::lifecycle::PipState;

/// Identifier wrapper for tracked employees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

/// Identifier wrapper for performance improvement plans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipId(pub String);

/// Employment status driven exclusively by the evaluators and the lifecycle
/// machine; `terminated` is a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Pip,
    Terminated,
}

impl EmployeeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Pip => "pip",
            EmployeeStatus::Terminated => "terminated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub manager_id: Option<EmployeeId>,
    pub status: EmployeeStatus,
}

/// Immutable performance observation. Appended once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub employee_id: EmployeeId,
    pub period: u32,
    pub score: f64,
    pub utilization: f64,
    pub tasks_completed: u32,
    pub date: NaiveDate,
}

/// One improvement-plan instance. Status changes flow through
/// `lifecycle::assert_transition`; the record freezes once a terminal state
/// is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pip {
    pub id: PipId,
    pub employee_id: EmployeeId,
    pub status: PipState,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub grace_period_days: u32,
    pub goals: Vec<String>,
    pub coaching_plan: String,
    pub progress: f64,
    pub initial_score: f64,
    pub current_score: Option<f64>,
    pub improvement_required: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingKind {
    Automated,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingSession {
    pub id: String,
    pub employee_id: EmployeeId,
    pub pip_id: Option<PipId>,
    pub feedback: String,
    pub kind: CoachingKind,
    pub score: Option<f64>,
    pub date: NaiveDate,
}

/// Append-only record of a state-changing action; the durable trail of why a
/// decision was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub actor: Option<String>,
    pub details: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

/// Snapshot written at the moment of termination, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminatedEmployee {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub termination_date: NaiveDate,
    pub termination_reason: String,
    pub termination_letter: String,
    pub letter_hash: String,
    pub final_score: Option<f64>,
    pub final_utilization: Option<f64>,
}

/// Process-wide automation thresholds, read as a snapshot at decision time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub kill_switch_active: bool,
    pub min_score_threshold: f64,
    pub min_utilization_threshold: f64,
    pub consecutive_low_periods: u32,
    pub default_grace_period: u32,
    pub min_improvement_percent: f64,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            kill_switch_active: false,
            min_score_threshold: 70.0,
            min_utilization_threshold: 60.0,
            consecutive_low_periods: 3,
            default_grace_period: 21,
            min_improvement_percent: 10.0,
        }
    }
}

/// Partial update applied through the administrative settings operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub kill_switch_active: Option<bool>,
    #[serde(default)]
    pub min_score_threshold: Option<f64>,
    #[serde(default)]
    pub min_utilization_threshold: Option<f64>,
    #[serde(default)]
    pub consecutive_low_periods: Option<u32>,
    #[serde(default)]
    pub default_grace_period: Option<u32>,
    #[serde(default)]
    pub min_improvement_percent: Option<f64>,
}

impl SystemSettings {
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            kill_switch_active: patch.kill_switch_active.unwrap_or(self.kill_switch_active),
            min_score_threshold: patch.min_score_threshold.unwrap_or(self.min_score_threshold),
            min_utilization_threshold: patch
                .min_utilization_threshold
                .unwrap_or(self.min_utilization_threshold),
            consecutive_low_periods: patch
                .consecutive_low_periods
                .unwrap_or(self.consecutive_low_periods),
            default_grace_period: patch
                .default_grace_period
                .unwrap_or(self.default_grace_period),
            min_improvement_percent: patch
                .min_improvement_percent
                .unwrap_or(self.min_improvement_percent),
        }
    }
}

/// Authenticated caller identity supplied by the HTTP adapter; the engines
/// never look at headers themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: PrincipalRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalRole {
    Manager,
    Hr,
    Viewer,
}

impl PrincipalRole {
    pub const fn label(self) -> &'static str {
        match self {
            PrincipalRole::Manager => "manager",
            PrincipalRole::Hr => "hr",
            PrincipalRole::Viewer => "viewer",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "manager" => Self::Manager,
            "hr" => Self::Hr,
            _ => Self::Viewer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

/// Latest-versus-recent-average movement of an employee's scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub change_percent: f64,
}

impl TrendAnalysis {
    pub fn flat() -> Self {
        Self {
            direction: TrendDirection::Stable,
            change_percent: 0.0,
        }
    }
}
