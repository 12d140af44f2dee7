//! Frontend proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                FRONTEND PROXY                │
//!   Client Request    │  ┌─────────┐    ┌──────────┐                 │
//!   ──────────────────┼─▶│  http   │───▶│ handlers │                 │
//!                     │  │ server  │    └────┬─────┘                 │
//!                     │  └─────────┘         │ /api/data             │
//!                     │                      │ /api/backend-health   │
//!                     │                      ▼                       │
//!   Client Response   │               ┌──────────────┐               │
//!   ◀─────────────────┼───────────────│   upstream   │◀──────────────┼──── Upstream
//!                     │               │    client    │               │     Service
//!                     │               └──────────────┘               │
//!                     │  config · lifecycle · observability          │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use frontend_proxy::config::{resolve_config, LogFormat, Overrides};
use frontend_proxy::lifecycle::startup;
use frontend_proxy::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "frontend-proxy", version)]
#[command(about = "JSON API that relays data and health from a single upstream service", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream base URL (overrides FLASK_BACKEND_URL).
    #[arg(short, long)]
    backend_url: Option<String>,

    /// Log output format.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let overrides = Overrides {
        port: cli.port,
        backend_url: cli.backend_url,
        log_format: cli.log_format,
    };

    let config = match resolve_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("frontend-proxy: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(
        &config.observability.log_level,
        config.observability.log_format,
    ) {
        eprintln!("frontend-proxy: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.listener.port,
        backend_url = %config.upstream.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
