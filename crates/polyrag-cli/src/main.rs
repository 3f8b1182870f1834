//! polyrag CLI - multi-tenant graph retrieval service.

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;

/// polyrag - bounded pool of per-tenant graph retrieval engines.
#[derive(Debug, Parser)]
#[command(name = "polyrag", version, about)]
struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: plain (default) or json (for log aggregation).
    #[arg(long, global = true, default_value = "plain", value_parser = ["plain", "json"])]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the graph API server.
    Serve(commands::serve::ServeArgs),
    /// Print the tenant roster.
    Tenants(commands::tenants::TenantsArgs),
    /// Probe whether a tenant's engine can be brought up.
    Probe(commands::probe::ProbeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing.
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    match cli.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    };

    tracing::debug!("polyrag starting with config: {:?}", cli.config);

    match &cli.command {
        Commands::Serve(args) => commands::serve::execute(args, cli.config.as_deref()).await,
        Commands::Tenants(args) => commands::tenants::execute(args, cli.config.as_deref()).await,
        Commands::Probe(args) => commands::probe::execute(args, cli.config.as_deref()).await,
    }
}
