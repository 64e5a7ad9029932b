//! MemberDesk — membership management platform for a trade association.
//!
//! Main entry point that initializes the registry and starts the server.

use clap::Parser;
use member_api::ApiServer;
use member_core::config::AppConfig;
use member_registry::MemberRegistry;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "member-desk")]
#[command(about = "Membership registry, reporting, and blast platform")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "MEMBER_DESK__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "MEMBER_DESK__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Start with an empty registry instead of demo data
    #[arg(long, default_value_t = false)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "member_desk=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("MemberDesk starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if cli.no_seed {
        config.registry.seed_demo_data = false;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        seed_demo_data = config.registry.seed_demo_data,
        "Configuration loaded"
    );

    let registry = if config.registry.seed_demo_data {
        Arc::new(MemberRegistry::with_demo_data())
    } else {
        Arc::new(MemberRegistry::new())
    };
    info!(members = registry.member_count(), "Registry initialized");

    // Start API server
    let api_server = ApiServer::new(config.clone(), registry);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("MemberDesk is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
