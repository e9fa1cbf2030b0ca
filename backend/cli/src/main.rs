mod config;
mod config_cmd;
mod status_cmd;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use callhub_config::{default_config_path, load_config, HubConfig};
use callhub_gateway::{build_router, serve, GatewayState, SignalingHub};
use callhub_logging::init_logger;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "callhub")]
#[command(about = "callhub: WebRTC call-signaling relay")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true, env = "CALLHUB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Query a running relay's health endpoint
    Status {
        /// Port the relay listens on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate the config and print the effective values
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli.config.unwrap_or_else(default_config_path);
    let file_config = load_config(&path).await?;
    let raw = config::apply_env_overrides(file_config, &std::env::vars().collect());

    match cli.command {
        Commands::Serve { port, bind } => {
            let raw = config::apply_cli_overrides(raw, port, bind);
            run_server(raw).await?;
        }
        Commands::Status { port } => {
            status_cmd::run(port.unwrap_or(raw.port())).await?;
        }
        Commands::CheckConfig => {
            init_logger(&config::log_options(&raw));
            config_cmd::run(raw)?;
        }
    }

    Ok(())
}

async fn run_server(raw: HubConfig) -> Result<()> {
    init_logger(&config::log_options(&raw));
    let config = callhub_config::prepare(raw)?;

    info!(
        addr = %config.listen_addr(),
        gateway_prefix = %config.gateway_prefix(),
        queue_capacity = config.queue_capacity(),
        write_timeout_ms = config.write_timeout_ms(),
        "Starting callhub signaling relay"
    );

    let hub = Arc::new(SignalingHub::new(config::relay_settings(&config)));
    let app = build_router(GatewayState::new(hub), config.gateway_prefix());

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;

    serve(listener, app, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
