//! Depovault
//!
//! Deposit ETH into and withdraw it from a vault contract, keeping a ledger
//! of every submitted transaction.

mod app;
mod config;
mod render;
mod shutdown;

use app::App;
use clap::{Parser, Subcommand};
use config::{ConfigLoader, get_database_url};
use render::{Renderer, print_history};
use shutdown::spawn_shutdown_watch;
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Depovault - deposit and withdraw ETH through a vault contract
#[derive(Parser, Debug)]
#[command(name = "depovault")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./depovault.toml")]
    config: PathBuf,

    /// Override the wallet provider JSON-RPC endpoint
    #[arg(long, env = "DEPOVAULT_RPC_URL")]
    rpc_url: Option<Url>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the wallet provider to authorize an account
    Connect,
    /// Show the connected wallet, vault balance and recent transactions
    Status,
    /// Deposit an amount of ETH into the vault
    Deposit { amount: String },
    /// Withdraw an amount of ETH from the vault
    Withdraw { amount: String },
    /// Show the vault balance of the connected wallet
    Balance,
    /// List the 50 most recent transactions of the connected wallet
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Settle pending records whose transactions have been included
    Reconcile {
        /// Keep sweeping until interrupted
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::debug!("Starting depovault v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.rpc_url.clone());
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!("Configuration loaded from {:?}", args.config);

    // Get database URL from environment
    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    // Create database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.store.max_connections)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;

    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    let app = App::new(&config, db_pool.clone());
    let renderer = Renderer::spawn(app.state.subscribe());

    app.session.probe_existing_session().await;

    let result = run_command(&app, args.command).await;

    renderer.finish().await;
    db_pool.close().await;

    result
}

async fn run_command(app: &App, command: Command) -> anyhow::Result<ExitCode> {
    let succeeded = match command {
        Command::Connect => {
            let connected = app.session.request_connection().await.is_ok();
            if connected {
                app.orchestrator.refresh_balance().await;
            }
            connected
        }
        Command::Status => {
            if app.state.wallet().is_none() {
                println!("No wallet connected. Run `depovault connect` first.");
                return Ok(ExitCode::FAILURE);
            }
            app.orchestrator.refresh_balance().await;
            print_history(&app.state.snapshot().history, false)?;
            true
        }
        Command::Deposit { amount } => app.orchestrator.deposit(&amount).await.is_ok(),
        Command::Withdraw { amount } => app.orchestrator.withdraw(&amount).await.is_ok(),
        Command::Balance => app.orchestrator.refresh_balance().await.is_some(),
        Command::History { json } => {
            if app.state.wallet().is_none() {
                println!("No wallet connected. Run `depovault connect` first.");
                return Ok(ExitCode::FAILURE);
            }
            print_history(&app.state.snapshot().history, json)?;
            true
        }
        Command::Reconcile { watch: true } => {
            let shutdown_rx = spawn_shutdown_watch().map_err(|e| {
                tracing::error!("Failed to install signal handlers: {}", e);
                e
            })?;
            app.reconciler.run(shutdown_rx).await;
            true
        }
        Command::Reconcile { watch: false } => {
            let report = app.reconciler.sweep_once().await?;
            println!(
                "Checked {} pending, {} completed, {} failed",
                report.checked, report.completed, report.failed
            );
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
