use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

use super::domain::{
    AuditEntry, CoachingSession, Employee, EmployeeId, EmployeeStatus, PerformanceMetric, Pip,
    PipId, SettingsPatch, SystemSettings, TerminatedEmployee,
};
use super::lifecycle::PipState;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over every persisted entity the workflow touches, so
/// the service module can be exercised against in-memory doubles.
pub trait WorkforceRepository: Send + Sync {
    fn employee(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError>;
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError>;
    fn insert_employee(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    fn update_employee_status(
        &self,
        id: &EmployeeId,
        status: EmployeeStatus,
    ) -> Result<Employee, RepositoryError>;

    fn metrics_for(&self, employee_id: &EmployeeId)
        -> Result<Vec<PerformanceMetric>, RepositoryError>;
    fn append_metrics(&self, metrics: Vec<PerformanceMetric>) -> Result<usize, RepositoryError>;

    fn pip(&self, id: &PipId) -> Result<Option<Pip>, RepositoryError>;
    fn pips_for(&self, employee_id: &EmployeeId) -> Result<Vec<Pip>, RepositoryError>;
    /// Plans currently in flight (`active` or `extended`).
    fn open_pips(&self) -> Result<Vec<Pip>, RepositoryError>;
    /// Insert a plan; rejects with a conflict when the employee already has
    /// an open plan, which backs the at-most-one-active-PIP invariant at the
    /// storage layer.
    fn insert_pip(&self, pip: Pip) -> Result<Pip, RepositoryError>;
    fn update_pip(&self, pip: Pip) -> Result<(), RepositoryError>;

    fn coaching_sessions_for(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<CoachingSession>, RepositoryError>;
    fn insert_coaching_session(
        &self,
        session: CoachingSession,
    ) -> Result<CoachingSession, RepositoryError>;

    fn audit_entries(&self) -> Result<Vec<AuditEntry>, RepositoryError>;
    fn record_audit(&self, entry: AuditEntry) -> Result<(), RepositoryError>;

    fn terminated_employees(&self) -> Result<Vec<TerminatedEmployee>, RepositoryError>;
    fn record_termination(&self, record: TerminatedEmployee) -> Result<(), RepositoryError>;

    fn settings(&self) -> Result<SystemSettings, RepositoryError>;
    fn update_settings(&self, patch: SettingsPatch) -> Result<SystemSettings, RepositoryError>;
}

/// Outbound sink for generated termination letters (document store, PDF
/// renderer, or e-mail adapters). Failures here must never revert the state
/// transition that produced the artifact.
pub trait ArtifactPublisher: Send + Sync {
    fn publish(&self, artifact: TerminationArtifact) -> Result<(), ArtifactError>;
}

/// Letter payload handed to the publisher alongside its digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminationArtifact {
    pub employee_id: EmployeeId,
    pub letter: String,
    pub content_hash: String,
}

/// Artifact dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact sink unavailable: {0}")]
    Unavailable(String),
}

/// Single-process store backing the demo deployment and the test suites.
/// Per-entity mutexes serialize the read-evaluate-write sections described
/// in the concurrency contract.
#[derive(Default)]
pub struct InMemoryRepository {
    employees: Mutex<HashMap<String, Employee>>,
    metrics: Mutex<Vec<PerformanceMetric>>,
    pips: Mutex<HashMap<String, Pip>>,
    coaching: Mutex<Vec<CoachingSession>>,
    audit: Mutex<Vec<AuditEntry>>,
    terminated: Mutex<Vec<TerminatedEmployee>>,
    settings: Mutex<SystemSettings>,
}

impl InMemoryRepository {
    fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<std::sync::MutexGuard<'a, T>, RepositoryError> {
        mutex
            .lock()
            .map_err(|_| RepositoryError::Unavailable(format!("{store} store poisoned")))
    }
}

impl WorkforceRepository for InMemoryRepository {
    fn employee(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let guard = Self::lock(&self.employees, "employee")?;
        Ok(guard.get(&id.0).cloned())
    }

    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        let guard = Self::lock(&self.employees, "employee")?;
        let mut employees: Vec<Employee> = guard.values().cloned().collect();
        employees.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(employees)
    }

    fn insert_employee(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        let mut guard = Self::lock(&self.employees, "employee")?;
        if guard.contains_key(&employee.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(employee.id.0.clone(), employee.clone());
        Ok(employee)
    }

    fn update_employee_status(
        &self,
        id: &EmployeeId,
        status: EmployeeStatus,
    ) -> Result<Employee, RepositoryError> {
        let mut guard = Self::lock(&self.employees, "employee")?;
        let employee = guard.get_mut(&id.0).ok_or(RepositoryError::NotFound)?;
        employee.status = status;
        Ok(employee.clone())
    }

    fn metrics_for(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<PerformanceMetric>, RepositoryError> {
        let guard = Self::lock(&self.metrics, "metric")?;
        let mut metrics: Vec<PerformanceMetric> = guard
            .iter()
            .filter(|metric| &metric.employee_id == employee_id)
            .cloned()
            .collect();
        metrics.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(metrics)
    }

    fn append_metrics(&self, metrics: Vec<PerformanceMetric>) -> Result<usize, RepositoryError> {
        let mut guard = Self::lock(&self.metrics, "metric")?;
        let appended = metrics.len();
        guard.extend(metrics);
        Ok(appended)
    }

    fn pip(&self, id: &PipId) -> Result<Option<Pip>, RepositoryError> {
        let guard = Self::lock(&self.pips, "pip")?;
        Ok(guard.get(&id.0).cloned())
    }

    fn pips_for(&self, employee_id: &EmployeeId) -> Result<Vec<Pip>, RepositoryError> {
        let guard = Self::lock(&self.pips, "pip")?;
        let mut pips: Vec<Pip> = guard
            .values()
            .filter(|pip| &pip.employee_id == employee_id)
            .cloned()
            .collect();
        pips.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(pips)
    }

    fn open_pips(&self) -> Result<Vec<Pip>, RepositoryError> {
        let guard = Self::lock(&self.pips, "pip")?;
        let mut pips: Vec<Pip> = guard
            .values()
            .filter(|pip| matches!(pip.status, PipState::Active | PipState::Extended))
            .cloned()
            .collect();
        pips.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(pips)
    }

    fn insert_pip(&self, pip: Pip) -> Result<Pip, RepositoryError> {
        let mut guard = Self::lock(&self.pips, "pip")?;
        let already_open = guard.values().any(|existing| {
            existing.employee_id == pip.employee_id
                && matches!(existing.status, PipState::Active | PipState::Extended)
        });
        if already_open || guard.contains_key(&pip.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(pip.id.0.clone(), pip.clone());
        Ok(pip)
    }

    fn update_pip(&self, pip: Pip) -> Result<(), RepositoryError> {
        let mut guard = Self::lock(&self.pips, "pip")?;
        if !guard.contains_key(&pip.id.0) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(pip.id.0.clone(), pip);
        Ok(())
    }

    fn coaching_sessions_for(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<CoachingSession>, RepositoryError> {
        let guard = Self::lock(&self.coaching, "coaching")?;
        let mut sessions: Vec<CoachingSession> = guard
            .iter()
            .filter(|session| &session.employee_id == employee_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(sessions)
    }

    fn insert_coaching_session(
        &self,
        session: CoachingSession,
    ) -> Result<CoachingSession, RepositoryError> {
        let mut guard = Self::lock(&self.coaching, "coaching")?;
        guard.push(session.clone());
        Ok(session)
    }

    fn audit_entries(&self) -> Result<Vec<AuditEntry>, RepositoryError> {
        let guard = Self::lock(&self.audit, "audit")?;
        let mut entries = guard.clone();
        entries.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(entries)
    }

    fn record_audit(&self, entry: AuditEntry) -> Result<(), RepositoryError> {
        let mut guard = Self::lock(&self.audit, "audit")?;
        guard.push(entry);
        Ok(())
    }

    fn terminated_employees(&self) -> Result<Vec<TerminatedEmployee>, RepositoryError> {
        let guard = Self::lock(&self.terminated, "termination")?;
        let mut records = guard.clone();
        records.sort_by(|a, b| b.termination_date.cmp(&a.termination_date));
        Ok(records)
    }

    fn record_termination(&self, record: TerminatedEmployee) -> Result<(), RepositoryError> {
        let mut guard = Self::lock(&self.terminated, "termination")?;
        guard.push(record);
        Ok(())
    }

    fn settings(&self) -> Result<SystemSettings, RepositoryError> {
        let guard = Self::lock(&self.settings, "settings")?;
        Ok(guard.clone())
    }

    fn update_settings(&self, patch: SettingsPatch) -> Result<SystemSettings, RepositoryError> {
        let mut guard = Self::lock(&self.settings, "settings")?;
        *guard = guard.merged(&patch);
        Ok(guard.clone())
    }
}

/// Artifact sink that archives letters in memory and logs each publication;
/// stands in for a document-store adapter in the demo deployment.
#[derive(Default)]
pub struct InMemoryArtifacts {
    published: Mutex<Vec<TerminationArtifact>>,
}

impl InMemoryArtifacts {
    pub fn published(&self) -> Vec<TerminationArtifact> {
        self.published
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ArtifactPublisher for InMemoryArtifacts {
    fn publish(&self, artifact: TerminationArtifact) -> Result<(), ArtifactError> {
        tracing::info!(
            employee = %artifact.employee_id.0,
            hash = %artifact.content_hash,
            "termination letter archived"
        );
        self.published
            .lock()
            .map_err(|_| ArtifactError::Unavailable("artifact archive poisoned".to_string()))?
            .push(artifact);
        Ok(())
    }
}
