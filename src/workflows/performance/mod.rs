//! Performance-management workflow: metric ingestion, PIP candidacy and
//! progress evaluation, lifecycle governance, coaching generation, and the
//! guarded termination path.
//!
//! The evaluators are pure; all side effects (plan creation, status
//! mutation, audit records, letter publication) live in the service module,
//! and every persisted status change passes through
//! `lifecycle::assert_transition` first.

pub mod coaching;
pub mod domain;
pub(crate) mod evaluation;
pub mod ingest;
pub mod letters;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;
pub mod termination;

#[cfg(test)]
mod tests;

pub use coaching::{
    CoachingCategory, CoachingContext, CoachingEngine, CoachingPriority, CoachingRecommendation,
};
pub use domain::{
    AuditEntry, CoachingKind, CoachingSession, Employee, EmployeeId, EmployeeStatus,
    PerformanceMetric, Pip, PipId, Principal, PrincipalRole, RiskLevel, SettingsPatch,
    SystemSettings, TerminatedEmployee, TrendAnalysis, TrendDirection,
};
pub use evaluation::{PipEvaluation, PipEvaluator, ProgressEvaluation};
pub use lifecycle::{assert_transition, PipState, TransitionError};
pub use repository::{
    ArtifactError, ArtifactPublisher, InMemoryArtifacts, InMemoryRepository, RepositoryError,
    TerminationArtifact, WorkforceRepository,
};
pub use router::performance_router;
pub use service::{
    CoachingReport, CoachingRequest, MetricsImportReport, PerformanceService,
    PerformanceServiceError, PipProgressReport, PipResolution, PipSweepAction, PipSweepReport,
    SweepOutcome, TerminationSweepEntry, TerminationSweepReport,
};
pub use termination::{
    TerminationGate, TerminationPolicyError, TerminationRequest, BLOCKING_RISK_FLAGS,
};
