//! `polyrag probe` command.
//!
//! The CLI face of the pool's switch probe: exit code 0 when the
//! tenant's engine can be brought up, 1 otherwise. Failure detail is
//! deliberately discarded; run `serve` with `-vv` for diagnostics.

use clap::Args;
use polyrag_config::load_config;
use polyrag_types::TenantId;

use crate::commands::build_pool;

/// Probe whether a tenant's engine can be brought up.
#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// The tenant id to probe.
    pub tenant: String,
}

/// Executes the probe command.
pub async fn execute(args: &ProbeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let pool = build_pool(&config);

    let tenant = TenantId::new(&args.tenant)?;
    let ok = pool.switch(&tenant).await;
    pool.cleanup().await;

    if ok {
        println!("{}: ok", tenant);
        Ok(())
    } else {
        println!("{}: unavailable", tenant);
        std::process::exit(1);
    }
}
