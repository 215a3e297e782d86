//! supportcrew - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use std::time::Duration;
use supportcrew::{
    agent::Orchestrator,
    cli::{Args, Commands},
    config::Config,
    telemetry::{self, TelemetryCollector},
};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if args.no_latency {
        config.tools.search_latency_ms = 0;
        config.tools.notify_latency_ms = 0;
        config.tools.ticket_latency_ms = 0;
    }

    telemetry::init_tracing(args.log_filter(&config.logging.filter))?;

    let tools = config
        .tools
        .build_gateway()
        .context("Failed to build tool gateway")?;
    let collector = TelemetryCollector::new();
    let orchestrator = Orchestrator::builder()
        .tools(tools)
        .telemetry(collector.clone())
        .build();

    let outcome = run(&args.command, &orchestrator).await;
    shutdown(&collector);
    outcome
}

async fn run(command: &Commands, orchestrator: &Orchestrator) -> Result<()> {
    match command {
        Commands::Request { query } => {
            let response = orchestrator.process_customer_request(query).await;
            print_json("Customer request", &response)?;
        }
        Commands::Escalate { issue } => {
            let result = orchestrator
                .handle_complex_escalation(issue)
                .await
                .context("Escalation failed")?;
            print_json("Escalation", &result)?;
        }
        Commands::Notify { user_id, message } => {
            let receipt = orchestrator
                .notify_customer(user_id, message)
                .await
                .context("Notification failed")?;
            print_json("Notification", &receipt)?;
        }
        Commands::Demo { pause_secs } => run_demo(orchestrator, *pause_secs).await?,
        Commands::Metrics => {
            print_json("Session metrics", &orchestrator.get_session_metrics())?;
        }
    }

    Ok(())
}

/// Parallel, sequential, pause/resume and metrics, one after another
async fn run_demo(orchestrator: &Orchestrator, pause_secs: u64) -> Result<()> {
    info!("=== Parallel agent execution ===");
    let response = orchestrator
        .process_customer_request("I have an issue with billing on my account")
        .await;
    print_json("Parallel agent execution", &response)?;

    info!("=== Sequential agent execution ===");
    let escalation = orchestrator
        .handle_complex_escalation("Critical: Service is completely down")
        .await
        .context("Escalation failed")?;
    print_json("Sequential agent execution", &escalation)?;

    info!("=== Long-running operations ===");
    orchestrator.pause_session();
    tokio::time::sleep(Duration::from_secs(pause_secs)).await;
    orchestrator.resume_session();

    info!("=== Observability & metrics ===");
    print_json("Session metrics", &orchestrator.get_session_metrics())?;

    Ok(())
}

fn print_json<T: Serialize>(title: &str, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", title.bold().cyan());
    println!("{}", body);
    Ok(())
}

fn shutdown(collector: &TelemetryCollector) {
    let stats = collector.get_stats();
    info!(
        elapsed_ms = collector.elapsed().as_millis() as u64,
        parallel_requests = stats.parallel_requests,
        escalations = stats.escalations,
        agent_queries = stats.agent_queries,
        agent_failures = stats.agent_failures,
        tickets_created = stats.tickets_created,
        success_rate = collector.agent_success_rate(),
        "Shutting down"
    );
    for event in collector.recent_events(10) {
        debug!(?event, "Recent telemetry event");
    }
}
