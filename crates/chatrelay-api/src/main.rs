//! chatrelay CLI and HTTP API entry point.
//!
//! Binary name: `chatrelay`
//!
//! Parses CLI arguments, loads configuration, then either serves the HTTP
//! API or runs a one-shot operator command.

mod cli;
mod http;
mod state;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use chatrelay_infra::config::{load_config, resolve_data_dir};
use chatrelay_observe::tracing_setup::filter_for_verbosity;
use chatrelay_observe::{TracingOptions, init_tracing, shutdown_tracing};
use chatrelay_types::config::RelayConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads env fallbacks.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: filter_for_verbosity(cli.verbose).to_string(),
        format: cli.log_format,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = resolve_data_dir();
    let mut config = load_config(&data_dir).await;

    let result = match cli.command {
        Commands::Serve(args) => {
            args.apply(&mut config);
            serve(config, data_dir).await
        }
        Commands::History { session_id, json } => {
            cli::history::show_history(&config, &data_dir, &session_id, json).await
        }
        Commands::Config { json } => cli::config::print_config(&config, &data_dir, json),
    };

    shutdown_tracing();
    result
}

async fn serve(config: RelayConfig, data_dir: PathBuf) -> anyhow::Result<()> {
    let state = AppState::init(config, data_dir).await?;

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        store = %state.config.store.backend,
        provider = state.orchestrator.client().name(),
        model = %state.config.provider.model,
        data_dir = %state.data_dir.display(),
        "chatrelay listening"
    );
    println!(
        "  {} chatrelay listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a signal handler cannot be installed, that branch never completes.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
