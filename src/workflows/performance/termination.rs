use serde::{Deserialize, Serialize};

use super::domain::{Principal, PrincipalRole};

/// Signoff payload accompanying a gated termination sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminationRequest {
    #[serde(default)]
    pub legal_signoff: bool,
    #[serde(default)]
    pub hr_signoff: bool,
    #[serde(default)]
    pub risk_flags: Vec<String>,
}

/// Risk tags that force a hold regardless of signoffs.
pub const BLOCKING_RISK_FLAGS: [&str; 3] = ["protected_class", "ongoing_leave", "whistleblower"];

/// Policy rejection raised before any termination logic runs. These are
/// expected outcomes in normal operation, not exceptional failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TerminationPolicyError {
    #[error("forbidden: role '{0}' may not trigger terminations")]
    Forbidden(String),
    #[error("dry run enabled - termination actions are blocked")]
    DryRunEnabled,
    #[error("missing signoff: {}", .0.join(", "))]
    MissingSignoff(Vec<&'static str>),
    #[error("risk requires hold: {}", .0.join(", "))]
    RiskHold(Vec<String>),
}

/// Interlock in front of the irreversible termination workflow.
///
/// Check order is fixed: role, dry-run, signoffs, risk-flag hold. The kill
/// switch is a separate, non-error short-circuit handled by the sweep itself
/// because "paused" is a successful outcome, not a rejection.
#[derive(Debug, Clone)]
pub struct TerminationGate {
    dry_run: bool,
}

impl TerminationGate {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run every policy check in order; the first failure wins.
    pub fn authorize(
        &self,
        principal: &Principal,
        request: &TerminationRequest,
    ) -> Result<(), TerminationPolicyError> {
        if !matches!(principal.role, PrincipalRole::Manager | PrincipalRole::Hr) {
            return Err(TerminationPolicyError::Forbidden(
                principal.role.label().to_string(),
            ));
        }

        if self.dry_run {
            return Err(TerminationPolicyError::DryRunEnabled);
        }

        let mut missing = Vec::new();
        if !request.legal_signoff {
            missing.push("legal_signoff");
        }
        if !request.hr_signoff {
            missing.push("hr_signoff");
        }
        if !missing.is_empty() {
            return Err(TerminationPolicyError::MissingSignoff(missing));
        }

        let held: Vec<String> = request
            .risk_flags
            .iter()
            .filter(|flag| BLOCKING_RISK_FLAGS.contains(&flag.as_str()))
            .cloned()
            .collect();
        if !held.is_empty() {
            return Err(TerminationPolicyError::RiskHold(held));
        }

        Ok(())
    }
}
