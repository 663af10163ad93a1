//! centerlinkd — the centerlink daemon.
//!
//! Single binary that assembles the centerlink subsystems:
//! - State store (redb)
//! - Intake services and assignment engine
//! - REST API
//!
//! # Usage
//!
//! ```text
//! centerlinkd serve --port 8080 --data-dir /var/lib/centerlink
//! centerlinkd assign --data-dir /var/lib/centerlink
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use centerlink_api::{ApiState, build_router};
use centerlink_assign::{AssignmentEngine, AssignmentReport};
use centerlink_core::{CenterlinkConfig, LogFormat, LoggingConfig};
use centerlink_state::StateStore;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "centerlinkd", about = "centerlink daemon")]
struct Cli {
    /// Path to centerlink.toml (defaults to ./centerlink.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the REST API.
    Serve {
        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,

        /// Data directory for persistent state.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Run a single assignment pass and print the report as JSON.
    Assign {
        /// Data directory for persistent state.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = CenterlinkConfig::load_or_default(cli.config.as_deref())?;

    init_tracing(&config.logging);

    match cli.command {
        Command::Serve { port, data_dir } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.storage.data_dir = data_dir;
            }
            run_server(config).await
        }
        Command::Assign { data_dir } => {
            if let Some(data_dir) = data_dir {
                config.storage.data_dir = data_dir;
            }
            run_assign(config)
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn open_store(config: &CenterlinkConfig) -> anyhow::Result<StateStore> {
    std::fs::create_dir_all(&config.storage.data_dir)?;
    let db_path = config.storage.db_path();
    let store = StateStore::open(&db_path)?;
    info!(path = ?db_path, "state store opened");
    Ok(store)
}

fn run_assign(config: CenterlinkConfig) -> anyhow::Result<()> {
    let store = open_store(&config)?;
    let engine = AssignmentEngine::new(store);

    let outcomes = match engine.assign_orders_to_centers() {
        Ok(outcomes) => outcomes,
        Err(e) => {
            // Outcomes committed before the failure are still reported.
            let partial = AssignmentReport::from(e.completed().to_vec());
            println!("{}", serde_json::to_string_pretty(&partial)?);
            return Err(e.into());
        }
    };
    let report = AssignmentReport::from(outcomes);
    info!(
        assigned = report.assigned_count(),
        pending = report.pending_count(),
        "assignment pass complete"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_server(config: CenterlinkConfig) -> anyhow::Result<()> {
    info!("centerlink daemon starting");

    let store = open_store(&config)?;
    let state = ApiState::with_accepted_sizes(store, config.intake.accepted_sizes.clone());
    let router = build_router(state);

    let addr = SocketAddr::new(config.server.bind, config.server.port);
    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("centerlink daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            // Without a signal handler, run until the process is killed.
            error!(error = %e, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    }
}
