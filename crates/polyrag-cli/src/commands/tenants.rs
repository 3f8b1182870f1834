//! `polyrag tenants` command.

use clap::Args;
use polyrag_config::load_config;
use polyrag_server::read_roster;

/// Print the tenant roster.
#[derive(Debug, Args)]
pub struct TenantsArgs {}

/// Executes the tenants command.
pub async fn execute(_args: &TenantsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let roster = read_roster(&config.server.roster_path).await?;

    if roster.is_empty() {
        println!("(no tenants in roster)");
        return Ok(());
    }
    for tenant in roster {
        println!("{tenant}");
    }
    Ok(())
}
