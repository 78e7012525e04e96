use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Duration, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use workforce_ai::config::AppConfig;
use workforce_ai::error::AppError;
use workforce_ai::telemetry;
use workforce_ai::workflows::performance::{
    performance_router, CoachingReport, CoachingRequest, Employee, EmployeeId, EmployeeStatus,
    InMemoryArtifacts, InMemoryRepository, PerformanceMetric, PerformanceService, PipSweepAction,
    PipSweepReport, Principal, PrincipalRole, SweepOutcome, TerminationGate, TerminationRequest,
    TerminationSweepEntry, TerminationSweepReport,
};

type DemoService = PerformanceService<InMemoryRepository, InMemoryArtifacts>;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Workforce Performance Orchestrator",
    about = "Run the automated HR performance-management service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the PIP/termination workflow end-to-end on seeded sample data
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug, Default)]
struct DemoArgs {
    /// Evaluation date for the demo (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn build_service(dry_run: bool) -> Arc<DemoService> {
    Arc::new(PerformanceService::new(
        Arc::new(InMemoryRepository::default()),
        Arc::new(InMemoryArtifacts::default()),
        TerminationGate::new(dry_run),
    ))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let service = build_service(config.automation.dry_run);

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(performance_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        dry_run = config.automation.dry_run,
        "performance orchestrator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

struct DemoSummary {
    pip_sweep: SweepOutcome<PipSweepReport>,
    coaching: Vec<CoachingReport>,
    terminations: SweepOutcome<TerminationSweepReport>,
    decision_day: NaiveDate,
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let service = build_service(false);

    seed_demo_population(&service, today)?;
    let summary = run_demo_workflow(&service, today)?;

    println!("Performance automation demo");
    println!("Evaluation date: {today}");

    match &summary.pip_sweep {
        SweepOutcome::Paused { message } => println!("\nPIP sweep: {message}"),
        SweepOutcome::Completed(report) => {
            println!(
                "\nPIP sweep: {} employee(s) processed, {} plan(s) opened",
                report.processed,
                report.results.len()
            );
            for action in &report.results {
                let PipSweepAction::PipCreated {
                    employee_id,
                    pip_id,
                    reason,
                    risk_level,
                } = action;
                println!(
                    "- {}: plan {} opened ({reason}, risk {})",
                    employee_id.0,
                    pip_id.0,
                    risk_level.label()
                );
            }
        }
    }

    for report in &summary.coaching {
        println!("\nCoaching feedback for {}:", report.session.employee_id.0);
        println!("{}", report.recommendation.feedback);
    }

    match &summary.terminations {
        SweepOutcome::Paused { message } => println!("\nTermination sweep: {message}"),
        SweepOutcome::Completed(report) => {
            println!(
                "\nTermination sweep (evaluated {}): {} plan(s) due",
                summary.decision_day, report.processed
            );
            for entry in &report.results {
                match entry {
                    TerminationSweepEntry::Terminated {
                        employee_id,
                        letter_hash,
                        ..
                    } => println!("- {}: terminated, letter hash {letter_hash}", employee_id.0),
                    TerminationSweepEntry::PipCompleted { employee_id, .. } => {
                        println!("- {}: plan completed successfully", employee_id.0)
                    }
                    TerminationSweepEntry::Extended {
                        employee_id,
                        new_end_date,
                        ..
                    } => println!("- {}: plan extended to {new_end_date}", employee_id.0),
                    TerminationSweepEntry::Failed {
                        employee_id, error, ..
                    } => println!("- {}: failed ({error})", employee_id.0),
                }
            }
        }
    }

    render_dashboard(&service)?;
    Ok(())
}

fn seed_demo_population(service: &DemoService, today: NaiveDate) -> Result<(), AppError> {
    let population = [
        ("E001", "Jordan Avery", [65.0, 60.0, 55.0]),
        ("E002", "Sam Whitfield", [85.0, 88.0, 90.0]),
    ];

    for (id, name, scores) in population {
        service.create_employee(Employee {
            id: EmployeeId(id.to_string()),
            name: name.to_string(),
            email: Some(format!("{}@example.test", id.to_lowercase())),
            department: Some("Operations".to_string()),
            role: Some("Analyst".to_string()),
            manager_id: None,
            status: EmployeeStatus::Active,
        })?;

        for (index, score) in scores.into_iter().enumerate() {
            let offset = 15 - 5 * index as i64;
            service.record_metric(PerformanceMetric {
                employee_id: EmployeeId(id.to_string()),
                period: index as u32 + 1,
                score,
                utilization: score - 5.0,
                tasks_completed: 10,
                date: today - Duration::days(offset),
            })?;
        }
    }

    Ok(())
}

fn run_demo_workflow(service: &DemoService, today: NaiveDate) -> Result<DemoSummary, AppError> {
    let pip_sweep = service.evaluate_pip_candidates(today)?;

    let mut coaching = Vec::new();
    if let SweepOutcome::Completed(report) = &pip_sweep {
        for action in &report.results {
            let PipSweepAction::PipCreated {
                employee_id,
                pip_id,
                ..
            } = action;
            let latest_score = service
                .metrics_for(employee_id)?
                .first()
                .map(|metric| metric.score)
                .unwrap_or(0.0);
            coaching.push(service.generate_coaching(
                CoachingRequest {
                    employee_id: employee_id.0.clone(),
                    score: latest_score,
                    pip_id: Some(pip_id.0.clone()),
                },
                today,
            )?);

            // The flagged employee fails to improve during the plan window.
            service.record_metric(PerformanceMetric {
                employee_id: employee_id.clone(),
                period: 4,
                score: 52.0,
                utilization: 48.0,
                tasks_completed: 6,
                date: today + Duration::days(22),
            })?;
        }
    }

    let decision_day = today + Duration::days(22);
    let terminations = service.evaluate_terminations(
        &Principal {
            id: "demo@local".to_string(),
            role: PrincipalRole::Hr,
        },
        &TerminationRequest {
            legal_signoff: true,
            hr_signoff: true,
            risk_flags: Vec::new(),
        },
        decision_day,
    )?;

    Ok(DemoSummary {
        pip_sweep,
        coaching,
        terminations,
        decision_day,
    })
}

fn render_dashboard(service: &DemoService) -> Result<(), AppError> {
    println!("\nPerformance dashboard");
    for employee in service.employees()? {
        let metrics = service.metrics_for(&employee.id)?;
        if metrics.is_empty() {
            println!("- {} ({}): no data", employee.name, employee.status.label());
            continue;
        }
        let scores: Vec<f64> = metrics.iter().map(|metric| metric.score).collect();
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "- {} ({}): mean {mean:.1}, min {min:.1}, max {max:.1}",
            employee.name,
            employee.status.label()
        );
    }
    Ok(())
}
