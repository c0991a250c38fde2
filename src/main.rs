// Leadex - Redis lead export to CSV
// Copyright (c) 2025 Leadex Contributors
// Licensed under the MIT License

use clap::Parser;
use leadex::cli::{Cli, Commands};
use leadex::config::{load_config, LeadexConfig, LoggingConfig};
use leadex::domain::Result as LeadexResult;
use leadex::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging and the default level come from the config when it loads;
    // commands report config errors themselves.
    let loaded = load_config(&cli.config);
    let (config_level, logging_config) = match &loaded {
        Ok(config) => (
            Some(config.application.log_level.clone()),
            config.logging.clone(),
        ),
        Err(_) => (None, LoggingConfig::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Leadex - Redis lead export to CSV"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(wait_for_shutdown(shutdown_tx));

    let exit_code = match execute_command(&cli, loaded, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // process::exit skips destructors, so flush file logs first
    drop(logging_guard);
    process::exit(exit_code);
}

/// Flip the shutdown channel on SIGINT or SIGTERM
async fn wait_for_shutdown(shutdown_tx: watch::Sender<bool>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                if tokio::signal::ctrl_c().await.is_ok() {
                    notify_shutdown(&shutdown_tx, "SIGINT");
                }
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => notify_shutdown(&shutdown_tx, "SIGINT"),
            _ = sigterm.recv() => notify_shutdown(&shutdown_tx, "SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        } else {
            notify_shutdown(&shutdown_tx, "SIGINT");
        }
    }
}

fn notify_shutdown(shutdown_tx: &watch::Sender<bool>, signal: &str) {
    tracing::info!(signal = signal, "Received shutdown signal, finishing current record");
    eprintln!("\n⚠️  Shutdown signal received, finishing current record...");
    let _ = shutdown_tx.send(true);
}

/// Execute the CLI command
async fn execute_command(
    cli: &Cli,
    loaded: LeadexResult<LeadexConfig>,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(loaded, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config, loaded).await,
        Commands::Init(args) => args.execute().await,
    }
}
