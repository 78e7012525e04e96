use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::workflows::performance::domain::{
    EmployeeId, EmployeeStatus, PipId, PrincipalRole, SettingsPatch,
};
use crate::workflows::performance::lifecycle::PipState;
use crate::workflows::performance::repository::WorkforceRepository;
use crate::workflows::performance::service::{
    CoachingRequest, PerformanceService, PerformanceServiceError, PipSweepAction, SweepOutcome,
    TerminationSweepEntry,
};
use crate::workflows::performance::termination::{TerminationGate, TerminationPolicyError};

#[test]
fn sweep_opens_a_plan_for_consecutive_low_scores() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    seed_employee(&repository, "e-low", EmployeeStatus::Active, &[50.0, 55.0, 60.0, 90.0, 90.0]);
    seed_employee(&repository, "e-ok", EmployeeStatus::Active, &[85.0, 88.0, 90.0]);

    let outcome = service.evaluate_pip_candidates(today).expect("sweep runs");

    let SweepOutcome::Completed(report) = outcome else {
        panic!("sweep should complete");
    };
    assert_eq!(report.processed, 2);
    assert_eq!(report.results.len(), 1);
    let PipSweepAction::PipCreated {
        employee_id,
        pip_id,
        reason,
        ..
    } = &report.results[0];
    assert_eq!(employee_id.0, "e-low");
    assert_eq!(reason, "3 consecutive periods below 70% threshold");

    let employee = repository
        .employee(employee_id)
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Pip);

    let pip = repository
        .pip(pip_id)
        .expect("fetch succeeds")
        .expect("pip present");
    assert_eq!(pip.status, PipState::Active);
    assert_eq!(pip.start_date, today);
    assert_eq!(pip.end_date, today + Duration::days(21));
    assert!((pip.initial_score - 50.0).abs() < f64::EPSILON);
    assert!(!pip.goals.is_empty());
    assert!(pip.coaching_plan.contains("coaching sessions"));

    let audit = repository.audit_entries().expect("audit readable");
    assert!(audit
        .iter()
        .any(|entry| entry.action == "pip_created_automatically"));
}

#[test]
fn second_sweep_never_opens_a_duplicate_plan() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    seed_employee(&repository, "e-low", EmployeeStatus::Active, &[50.0, 55.0, 60.0]);

    let first = service.evaluate_pip_candidates(today).expect("first sweep");
    let SweepOutcome::Completed(first_report) = first else {
        panic!("sweep should complete");
    };
    assert_eq!(first_report.results.len(), 1);

    let second = service.evaluate_pip_candidates(today).expect("second sweep");
    let SweepOutcome::Completed(second_report) = second else {
        panic!("sweep should complete");
    };
    assert!(second_report.results.is_empty());

    let pips = repository
        .pips_for(&EmployeeId("e-low".to_string()))
        .expect("pips readable");
    assert_eq!(pips.len(), 1);

    // The evaluator explains the no-op.
    let employee = repository
        .employee(&EmployeeId("e-low".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    let evaluation = evaluator().evaluate_candidate(
        &employee,
        &repository
            .metrics_for(&employee.id)
            .expect("metrics readable"),
    );
    assert!(!evaluation.should_create_pip);
    assert!(evaluation.reason.contains("already has an active PIP"));
}

#[test]
fn kill_switch_pauses_both_sweeps_without_error() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    seed_employee(&repository, "e-low", EmployeeStatus::Active, &[10.0, 10.0, 10.0]);
    seed_due_pip(
        &repository,
        "e-due",
        "pip-due",
        60.0,
        &[61.0],
        today - Duration::days(21),
        today,
    );
    service
        .update_settings(
            SettingsPatch {
                kill_switch_active: Some(true),
                ..SettingsPatch::default()
            },
            None,
        )
        .expect("settings update");

    let pip_sweep = service.evaluate_pip_candidates(today).expect("sweep runs");
    assert!(matches!(
        pip_sweep,
        SweepOutcome::Paused { ref message } if message.contains("Kill switch")
    ));

    let terminations = service
        .evaluate_terminations(&principal(PrincipalRole::Hr), &signed_request(), today)
        .expect("gated sweep runs");
    assert!(matches!(terminations, SweepOutcome::Paused { .. }));

    // No state was touched.
    let employee = repository
        .employee(&EmployeeId("e-low".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Active);
    let due = repository
        .employee(&EmployeeId("e-due".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(due.status, EmployeeStatus::Pip);
}

#[test]
fn due_plan_with_insufficient_improvement_terminates() {
    let (service, repository, artifacts) = build_service();
    let today = anchor_date();
    let pip = seed_due_pip(
        &repository,
        "e-fail",
        "pip-fail",
        60.0,
        &[61.0, 58.0],
        today - Duration::days(21),
        today,
    );

    let outcome = service
        .evaluate_terminations(&principal(PrincipalRole::Hr), &signed_request(), today)
        .expect("gated sweep runs");

    let SweepOutcome::Completed(report) = outcome else {
        panic!("sweep should complete");
    };
    assert_eq!(report.processed, 1);
    assert!(matches!(
        report.results.as_slice(),
        [TerminationSweepEntry::Terminated { employee_id, .. }] if employee_id.0 == "e-fail"
    ));

    let employee = repository
        .employee(&EmployeeId("e-fail".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Terminated);

    let stored = repository
        .pip(&pip.id)
        .expect("fetch succeeds")
        .expect("pip present");
    assert_eq!(stored.status, PipState::Terminated);

    let terminated = repository
        .terminated_employees()
        .expect("records readable");
    assert_eq!(terminated.len(), 1);
    assert!(terminated[0].termination_letter.contains("EMPLOYMENT TERMINATION NOTICE"));
    assert_eq!(terminated[0].letter_hash.len(), 64);
    assert!(terminated[0].termination_reason.contains("threshold"));

    let published = artifacts.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].content_hash, terminated[0].letter_hash);

    let audit = repository.audit_entries().expect("audit readable");
    assert!(audit.iter().any(|entry| entry.action == "employee_terminated"));
}

#[test]
fn due_plan_that_met_the_bar_completes() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    let pip = seed_due_pip(
        &repository,
        "e-win",
        "pip-win",
        60.0,
        &[78.0, 74.0],
        today - Duration::days(21),
        today,
    );

    let outcome = service
        .evaluate_terminations(&principal(PrincipalRole::Hr), &signed_request(), today)
        .expect("gated sweep runs");

    let SweepOutcome::Completed(report) = outcome else {
        panic!("sweep should complete");
    };
    assert!(matches!(
        report.results.as_slice(),
        [TerminationSweepEntry::PipCompleted { employee_id, .. }] if employee_id.0 == "e-win"
    ));

    let employee = repository
        .employee(&EmployeeId("e-win".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Active);

    let stored = repository
        .pip(&pip.id)
        .expect("fetch succeeds")
        .expect("pip present");
    assert_eq!(stored.status, PipState::Completed);
    assert!((stored.progress - 100.0).abs() < f64::EPSILON);

    let audit = repository.audit_entries().expect("audit readable");
    assert!(audit.iter().any(|entry| entry.action == "pip_completed"));
}

#[test]
fn due_plan_with_partial_improvement_extends() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    let pip = seed_due_pip(
        &repository,
        "e-mid",
        "pip-mid",
        60.0,
        &[64.0, 62.0],
        today - Duration::days(21),
        today,
    );

    let outcome = service
        .evaluate_terminations(&principal(PrincipalRole::Hr), &signed_request(), today)
        .expect("gated sweep runs");

    let SweepOutcome::Completed(report) = outcome else {
        panic!("sweep should complete");
    };
    let expected_end = today + Duration::days(21);
    assert!(matches!(
        report.results.as_slice(),
        [TerminationSweepEntry::Extended { employee_id, new_end_date, .. }]
            if employee_id.0 == "e-mid" && *new_end_date == expected_end
    ));

    let stored = repository
        .pip(&pip.id)
        .expect("fetch succeeds")
        .expect("pip present");
    assert_eq!(stored.status, PipState::Extended);
    assert_eq!(stored.end_date, expected_end);

    // The employee stays on the plan.
    let employee = repository
        .employee(&EmployeeId("e-mid".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Pip);
}

#[test]
fn single_plan_evaluation_applies_the_resolution() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    let pip = seed_due_pip(
        &repository,
        "e-fail",
        "pip-fail",
        60.0,
        &[61.0, 58.0],
        today - Duration::days(21),
        today,
    );

    let report = service
        .evaluate_pip_progress(&pip.id, today)
        .expect("evaluation runs");

    assert!(report.evaluation.should_terminate);
    assert!(matches!(
        report.resolution,
        crate::workflows::performance::service::PipResolution::Terminated { .. }
    ));
    let employee = repository
        .employee(&EmployeeId("e-fail".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Terminated);
}

#[test]
fn in_flight_plan_evaluation_refreshes_the_snapshot_only() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    let pip = seed_due_pip(
        &repository,
        "e-mid",
        "pip-mid",
        60.0,
        &[64.0, 62.0],
        today - Duration::days(7),
        today + Duration::days(14),
    );

    let report = service
        .evaluate_pip_progress(&pip.id, today)
        .expect("evaluation runs");

    assert!(matches!(
        report.resolution,
        crate::workflows::performance::service::PipResolution::InProgress
    ));
    let stored = repository
        .pip(&pip.id)
        .expect("fetch succeeds")
        .expect("pip present");
    assert_eq!(stored.status, PipState::Active);
    assert_eq!(stored.current_score, Some(64.0));
    assert!(stored.progress > 0.0);

    let employee = repository
        .employee(&EmployeeId("e-mid".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Pip);
}

#[test]
fn dry_run_rejects_the_gated_sweep_before_evaluation() {
    let (service, repository, _) = build_service_with_gate(TerminationGate::new(true));
    let today = anchor_date();
    seed_due_pip(
        &repository,
        "e-fail",
        "pip-fail",
        60.0,
        &[61.0],
        today - Duration::days(21),
        today,
    );

    let error = service
        .evaluate_terminations(&principal(PrincipalRole::Hr), &signed_request(), today)
        .expect_err("dry run must block");

    assert!(matches!(
        error,
        PerformanceServiceError::Policy(TerminationPolicyError::DryRunEnabled)
    ));

    // Nothing moved.
    let employee = repository
        .employee(&EmployeeId("e-fail".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Pip);
}

#[test]
fn dry_run_blocks_the_single_plan_evaluation_too() {
    let (service, repository, _) = build_service_with_gate(TerminationGate::new(true));
    let today = anchor_date();
    let pip = seed_due_pip(
        &repository,
        "e-fail",
        "pip-fail",
        60.0,
        &[61.0, 58.0],
        today - Duration::days(21),
        today,
    );

    let error = service
        .evaluate_pip_progress(&pip.id, today)
        .expect_err("dry run must block the terminating branch");

    assert!(matches!(
        error,
        PerformanceServiceError::Policy(TerminationPolicyError::DryRunEnabled)
    ));
    let employee = repository
        .employee(&EmployeeId("e-fail".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Pip);
}

#[test]
fn terminated_employees_never_reenter_the_pipeline() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    seed_due_pip(
        &repository,
        "e-gone",
        "pip-gone",
        60.0,
        &[61.0, 58.0],
        today - Duration::days(21),
        today,
    );

    let outcome = service
        .evaluate_terminations(&principal(PrincipalRole::Hr), &signed_request(), today)
        .expect("gated sweep runs");
    assert!(matches!(
        outcome,
        SweepOutcome::Completed(ref report)
            if matches!(report.results.as_slice(), [TerminationSweepEntry::Terminated { .. }])
    ));

    // Fresh low scores arrive after the termination.
    repository
        .append_metrics(scored_metrics_from(
            "e-gone",
            &[10.0, 10.0, 10.0],
            today + Duration::days(30),
            20,
        ))
        .expect("metrics appended");

    let sweep = service
        .evaluate_pip_candidates(today + Duration::days(30))
        .expect("sweep runs");
    let SweepOutcome::Completed(report) = sweep else {
        panic!("sweep should complete");
    };
    assert!(report.results.is_empty());

    let employee = repository
        .employee(&EmployeeId("e-gone".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Terminated);

    // Coaching is also refused.
    let error = service
        .generate_coaching(
            CoachingRequest {
                employee_id: "e-gone".to_string(),
                score: 40.0,
                pip_id: None,
            },
            today + Duration::days(30),
        )
        .expect_err("terminated employee cannot be coached");
    assert!(matches!(error, PerformanceServiceError::Validation(_)));
}

#[test]
fn artifact_failure_never_reverts_the_termination() {
    let repository = Arc::new(crate::workflows::performance::repository::InMemoryRepository::default());
    let artifacts = Arc::new(FailingArtifacts);
    let service = PerformanceService::new(
        repository.clone(),
        artifacts,
        TerminationGate::new(false),
    );
    let today = anchor_date();
    seed_due_pip(
        &repository,
        "e-fail",
        "pip-fail",
        60.0,
        &[61.0, 58.0],
        today - Duration::days(21),
        today,
    );

    let outcome = service
        .evaluate_terminations(&principal(PrincipalRole::Hr), &signed_request(), today)
        .expect("gated sweep runs");

    let SweepOutcome::Completed(report) = outcome else {
        panic!("sweep should complete");
    };
    assert!(matches!(
        report.results.as_slice(),
        [TerminationSweepEntry::Terminated { .. }]
    ));

    let employee = repository
        .employee(&EmployeeId("e-fail".to_string()))
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(employee.status, EmployeeStatus::Terminated);
    assert_eq!(
        repository.terminated_employees().expect("records readable").len(),
        1
    );

    let audit = repository.audit_entries().expect("audit readable");
    assert!(audit.iter().any(|entry| entry.action == "employee_terminated"));
    assert!(audit
        .iter()
        .any(|entry| entry.action == "termination_letter_failed"));
}

#[test]
fn one_bad_record_does_not_abort_the_batch() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    seed_due_pip(
        &repository,
        "e-fine",
        "pip-a-fine",
        60.0,
        &[61.0, 58.0],
        today - Duration::days(21),
        today,
    );
    // A plan whose employee record is missing entirely.
    let orphan = crate::workflows::performance::domain::Pip {
        id: PipId("pip-b-orphan".to_string()),
        employee_id: EmployeeId("e-ghost".to_string()),
        status: PipState::Active,
        start_date: today - Duration::days(21),
        end_date: today,
        grace_period_days: 21,
        goals: Vec::new(),
        coaching_plan: String::new(),
        progress: 0.0,
        initial_score: 60.0,
        current_score: None,
        improvement_required: 10.0,
    };
    repository.insert_pip(orphan).expect("orphan inserted");

    let outcome = service
        .evaluate_terminations(&principal(PrincipalRole::Hr), &signed_request(), today)
        .expect("gated sweep runs");

    let SweepOutcome::Completed(report) = outcome else {
        panic!("sweep should complete");
    };
    assert_eq!(report.processed, 2);
    assert!(report.results.iter().any(|entry| matches!(
        entry,
        TerminationSweepEntry::Terminated { employee_id, .. } if employee_id.0 == "e-fine"
    )));
    assert!(report.results.iter().any(|entry| matches!(
        entry,
        TerminationSweepEntry::Failed { employee_id, .. } if employee_id.0 == "e-ghost"
    )));
}

#[test]
fn coaching_persists_an_automated_session() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    seed_employee(&repository, "e-1", EmployeeStatus::Active, &[65.0, 62.0, 60.0]);

    let report = service
        .generate_coaching(
            CoachingRequest {
                employee_id: "e-1".to_string(),
                score: 65.0,
                pip_id: None,
            },
            today,
        )
        .expect("coaching generated");

    assert_eq!(report.session.feedback, report.recommendation.feedback);
    assert_eq!(report.session.score, Some(65.0));

    let sessions = repository
        .coaching_sessions_for(&EmployeeId("e-1".to_string()))
        .expect("sessions readable");
    assert_eq!(sessions.len(), 1);

    let audit = repository.audit_entries().expect("audit readable");
    assert!(audit.iter().any(|entry| entry.action == "coaching_generated"));
}

#[test]
fn coaching_for_unknown_employee_is_not_found() {
    let (service, _, _) = build_service();

    let error = service
        .generate_coaching(
            CoachingRequest {
                employee_id: "nobody".to_string(),
                score: 50.0,
                pip_id: None,
            },
            anchor_date(),
        )
        .expect_err("unknown employee");

    assert!(matches!(
        error,
        PerformanceServiceError::Repository(
            crate::workflows::performance::repository::RepositoryError::NotFound
        )
    ));
}

#[test]
fn settings_update_merges_partial_patches_and_audits() {
    let (service, repository, _) = build_service();

    let updated = service
        .update_settings(
            SettingsPatch {
                min_score_threshold: Some(75.0),
                ..SettingsPatch::default()
            },
            Some(&principal(PrincipalRole::Manager)),
        )
        .expect("settings update");

    assert!((updated.min_score_threshold - 75.0).abs() < f64::EPSILON);
    assert_eq!(updated.consecutive_low_periods, 3);
    assert!(!updated.kill_switch_active);

    let audit = repository.audit_entries().expect("audit readable");
    let entry = audit
        .iter()
        .find(|entry| entry.action == "system_settings_updated")
        .expect("audit entry present");
    assert_eq!(entry.actor.as_deref(), Some("ops@local"));
}

#[test]
fn csv_import_appends_metrics_and_runs_the_sweep() {
    let (service, repository, _) = build_service();
    let today = anchor_date();
    repository
        .insert_employee(employee("E001", EmployeeStatus::Active))
        .expect("employee inserted");

    let csv = "\
employee_id,period,score,utilization,tasks_completed,date
E001,1,65,70,12,2025-06-16
E001,2,60,65,11,2025-06-23
E001,3,55,60,9,2025-06-30
";

    let report = service
        .import_metrics(csv.as_bytes(), today)
        .expect("import succeeds");

    assert_eq!(report.metrics_created, 3);
    let SweepOutcome::Completed(sweep) = report.pip_evaluation else {
        panic!("sweep should complete");
    };
    assert_eq!(sweep.results.len(), 1);

    let audit = repository.audit_entries().expect("audit readable");
    assert!(audit.iter().any(|entry| entry.action == "csv_uploaded"));
}

#[test]
fn csv_import_rejects_out_of_range_scores() {
    let (service, _, _) = build_service();

    let csv = "\
employee_id,period,score,utilization,tasks_completed,date
E001,1,140,70,12,2025-06-16
";

    let error = service
        .import_metrics(csv.as_bytes(), anchor_date())
        .expect_err("invalid row rejected");

    assert!(matches!(error, PerformanceServiceError::Ingest(_)));
    assert!(error.to_string().contains("outside 0-100"));
}
