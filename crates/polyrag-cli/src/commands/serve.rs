//! `polyrag serve` command.
//!
//! Starts the graph API server, optionally preloading the tenant
//! roster into the pool first.

use clap::Args;
use polyrag_config::load_config;
use polyrag_engine::EngineOverrides;
use polyrag_server::{read_roster, AppState, HttpServer};

use crate::commands::build_pool;

/// Start the graph API server.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// TCP port (overrides the configured port).
    #[arg(long)]
    pub port: Option<u16>,
    /// Bearer token for authentication (overrides the configured token).
    #[arg(long)]
    pub token: Option<String>,
    /// Skip roster preloading even when the config enables it.
    #[arg(long)]
    pub no_preload: bool,
}

/// Executes the serve command.
pub async fn execute(args: &ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.token.is_some() {
        config.server.token = args.token.clone();
    }

    let pool = build_pool(&config);

    if config.pool.preload && !args.no_preload {
        let roster = read_roster(&config.server.roster_path).await?;
        if !roster.is_empty() {
            let report = pool.preload(&roster, &EngineOverrides::default()).await;
            tracing::info!(
                succeeded = report.succeeded.len(),
                failed = report.failed.len(),
                "roster preload finished"
            );
        }
    }

    let state = AppState {
        pool,
        roster_path: config.server.roster_path.clone(),
        token: config.server.token.clone(),
    };
    let server = HttpServer::new(state, &config.server.host, config.server.port)?;
    server.run().await?;
    Ok(())
}
