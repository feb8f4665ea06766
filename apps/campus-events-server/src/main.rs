mod config;
mod logging;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use campus_events::{Backend, CampusEventsModule};
use clap::{Parser, Subcommand};
use config::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Campus Events Server - registration, attendance and feedback for campus events
#[derive(Parser)]
#[command(name = "campus-events-server")]
#[command(about = "Campus Events Server - registration, attendance and feedback for campus events")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use the in-memory store instead of the configured database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration and database connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_layered(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliArgs {
        port: cli.port,
        verbose: cli.verbose,
    });

    // stdout carries only the YAML here
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init_logging(&config.logging);
    tracing::info!("Campus Events Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, cli.mock).await,
        Commands::Check => check_config(config, cli.mock).await,
    }
}

async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let url = cfg.url.trim();
    if url.is_empty() {
        anyhow::bail!("Database URL not configured");
    }

    let mut opts = ConnectOptions::new(url.to_owned());
    opts.max_connections(cfg.max_conns)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_sec))
        .sqlx_logging(false);

    let redacted = config::redact_credentials_in_url(url);
    tracing::info!(url = %redacted, "Connecting to database");
    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database '{redacted}'"))
}

/// Open the storage backend and run migrations when it is a database
async fn open_backend(config: &AppConfig, mock: bool) -> Result<Backend> {
    if mock {
        tracing::warn!("Running with the in-memory store, data is not persisted");
        return Ok(Backend::InMemory(Arc::default()));
    }
    let db = connect(&config.database).await?;
    CampusEventsModule::migrate(&db).await?;
    Ok(Backend::Database(Arc::new(db)))
}

async fn run_server(config: AppConfig, mock: bool) -> Result<()> {
    let backend = open_backend(&config, mock).await?;

    let module = CampusEventsModule::default();
    module.init(config.modules.campus_events.clone(), backend)?;

    let router = Router::new().route("/health", get(|| async { "ok" }));
    let router = module.register_rest(router)?.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signals");
        }
        signal_cancel.cancel();
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Campus Events Server stopped");
    Ok(())
}

async fn check_config(config: AppConfig, mock: bool) -> Result<()> {
    let backend = open_backend(&config, mock).await?;
    CampusEventsModule::default().init(config.modules.campus_events.clone(), backend)?;
    println!("Configuration OK");
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = tokio::signal::ctrl_c() => {},
        }
        tracing::info!("shutdown: signal received");
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown: ctrl-c received");
        Ok(())
    }
}
