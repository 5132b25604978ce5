use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tour_ops::config::AppConfig;
use tour_ops::error::AppError;
use tour_ops::telemetry;
use tour_ops::workflows::pipeline::{
    derive_events, rank_leads, upcoming, ActivityEntry, ActivityKind, InMemoryLeadRepository,
    Lead, LeadCsvImporter, LeadId, LeadStatus, Payment, PaymentStatus, PipelineService, Task,
    TaskId, TaskPriority, Temperature, TravelDates,
};
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Tour Ops Pipeline",
    about = "Run the lead pipeline service or print agenda reports from the command line",
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
    /// Print the prioritized board and upcoming agenda
    Agenda(AgendaArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Seed the in-memory store from a CRM lead export (CSV)
    #[arg(long)]
    leads_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AgendaArgs {
    /// CRM lead export to load (CSV); built-in sample data when omitted
    #[arg(long)]
    leads_csv: Option<PathBuf>,
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Maximum number of upcoming events to list
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Also list every derived calendar event
    #[arg(long)]
    list_events: bool,
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
        Command::Agenda(args) => run_agenda(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
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

    let leads = match args.leads_csv {
        Some(path) => LeadCsvImporter::from_path(path)?,
        None => Vec::new(),
    };
    info!(seeded = leads.len(), "lead store initialized");

    let repository = Arc::new(InMemoryLeadRepository::with_leads(leads));
    let service = Arc::new(PipelineService::new(repository));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(tour_ops::workflows::pipeline::pipeline_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead pipeline service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_agenda(args: AgendaArgs) -> Result<(), AppError> {
    let now = args
        .today
        .map(|day| day.and_time(NaiveTime::MIN))
        .unwrap_or_else(|| Local::now().naive_local());

    let (leads, source) = match args.leads_csv {
        Some(path) => (LeadCsvImporter::from_path(path)?, "CSV export"),
        None => (sample_leads(now), "built-in sample data"),
    };

    println!("Lead pipeline agenda (evaluated {})", now.date());
    println!("Data source: {source}");

    println!("\nPrioritized board");
    for (lead, score) in rank_leads(&leads, now) {
        println!(
            "- [{:>3}] {} | {} -> {} | {} | {} travelers",
            score.total,
            lead.client_name,
            lead.status.label(),
            lead.destination,
            lead.temperature.label(),
            lead.travelers,
        );
    }

    let events = derive_events(&leads, now);
    let next = upcoming(&events, now, args.limit);
    if next.is_empty() {
        println!("\nUpcoming events: none");
    } else {
        println!("\nUpcoming events");
        for event in next {
            println!(
                "- {} | {} | {} | {}",
                event.date.date(),
                event.kind.label(),
                event.priority.label(),
                event.title
            );
        }
    }

    if args.list_events {
        println!("\nAll derived events");
        for event in &events {
            let overdue_note = if event.is_overdue { " (overdue)" } else { "" };
            println!(
                "- {} | {} | {} | lead {}{}",
                event.date.date(),
                event.kind.label(),
                event.title,
                event.lead_id.0,
                overdue_note
            );
        }
    }

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

/// Small seeded pipeline used by the agenda command when no export is
/// provided: a booked trip about to depart, a hot lead with an overdue
/// task, and a lead that has gone quiet.
fn sample_leads(now: NaiveDateTime) -> Vec<Lead> {
    let today = now.date();

    let booked = Lead {
        id: LeadId("lead-rossi".to_string()),
        client_name: "Famiglia Rossi".to_string(),
        contact: "rossi@example.com".to_string(),
        destination: "Amalfi Coast".to_string(),
        travelers: 4,
        estimated_value: 12_400,
        payment: Payment {
            total: 12_400,
            paid: 6_200,
            status: PaymentStatus::Partial,
        },
        status: LeadStatus::Booked,
        temperature: Temperature::Warm,
        ai_score: 68,
        travel_dates: TravelDates {
            from: today + Duration::days(5),
            to: today + Duration::days(12),
        },
        created_at: now - Duration::days(40),
        updated_at: now - Duration::days(1),
        tasks: vec![Task {
            id: TaskId("task-rossi-balance".to_string()),
            description: "Collect remaining balance".to_string(),
            due_date: now + Duration::days(2),
            is_completed: false,
            priority: TaskPriority::High,
        }],
        activity: vec![ActivityEntry {
            id: "act-rossi-1".to_string(),
            kind: ActivityKind::Email,
            content: "Sent final itinerary".to_string(),
            timestamp: now - Duration::days(1),
            author: "agent".to_string(),
        }],
    };

    let hot = Lead {
        id: LeadId("lead-tanaka".to_string()),
        client_name: "Tanaka Honeymoon".to_string(),
        contact: "+81 90 0000 0000".to_string(),
        destination: "Santorini".to_string(),
        travelers: 2,
        estimated_value: 9_800,
        payment: Payment {
            total: 9_800,
            paid: 0,
            status: PaymentStatus::Pending,
        },
        status: LeadStatus::Quoting,
        temperature: Temperature::Hot,
        ai_score: 87,
        travel_dates: TravelDates {
            from: today + Duration::days(60),
            to: today + Duration::days(70),
        },
        created_at: now - Duration::days(6),
        updated_at: now - Duration::days(1),
        tasks: vec![Task {
            id: TaskId("task-tanaka-quote".to_string()),
            description: "Send revised quote".to_string(),
            due_date: now - Duration::days(1),
            is_completed: false,
            priority: TaskPriority::High,
        }],
        activity: vec![ActivityEntry {
            id: "act-tanaka-1".to_string(),
            kind: ActivityKind::Call,
            content: "Discussed room upgrades".to_string(),
            timestamp: now - Duration::days(2),
            author: "agent".to_string(),
        }],
    };

    let quiet = Lead {
        id: LeadId("lead-muller".to_string()),
        client_name: "Müller Group".to_string(),
        contact: "mueller@example.com".to_string(),
        destination: "Patagonia".to_string(),
        travelers: 8,
        estimated_value: 54_000,
        payment: Payment {
            total: 54_000,
            paid: 0,
            status: PaymentStatus::Pending,
        },
        status: LeadStatus::Negotiation,
        temperature: Temperature::Warm,
        ai_score: 52,
        travel_dates: TravelDates {
            from: today + Duration::days(120),
            to: today + Duration::days(134),
        },
        created_at: now - Duration::days(30),
        updated_at: now - Duration::days(7),
        tasks: Vec::new(),
        activity: vec![ActivityEntry {
            id: "act-muller-1".to_string(),
            kind: ActivityKind::Meeting,
            content: "Group size confirmed at eight".to_string(),
            timestamp: now - Duration::days(7),
            author: "agent".to_string(),
        }],
    };

    vec![booked, hot, quiet]
}
