//! Keysweep daemon: boots the sweep scheduler and runs until ctrl-c.
//!
//! There is no CLI surface; configuration comes from the TOML config
//! file and environment overrides. The in-memory job store here is the
//! standalone default; embedding applications supply their own
//! [`keysweep_scheduler::JobStore`].

use anyhow::Context;
use keysweep_core::AppConfig;
use keysweep_host::{GithubClient, SearchPager};
use keysweep_scheduler::{MemoryJobStore, Scheduler};
use keysweep_sweep::{ActionRegistry, IssuerValidator, LogSink, SweepWorker};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keysweep=info")),
        )
        .init();

    let config = AppConfig::load_with_env().context("failed to load configuration")?;

    let host = Arc::new(GithubClient::new(&config.host).context("failed to build host client")?);
    let validator =
        Arc::new(IssuerValidator::new(&config.issuer).context("failed to build validator")?);
    let worker = SweepWorker::new(
        host,
        validator,
        Arc::new(LogSink),
        Arc::new(ActionRegistry::new()),
        SearchPager::new(config.host.max_pages),
    );

    let store = Arc::new(MemoryJobStore::new());
    let mut scheduler = Scheduler::new(store, Arc::new(worker), &config.scheduler);
    let loaded = scheduler
        .load_pending()
        .await
        .context("job source unreachable")?;
    tracing::info!(
        loaded,
        max_workers = config.scheduler.max_workers,
        "keysweep booted"
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    scheduler.run(shutdown_rx).await?;
    tracing::info!("keysweep stopped");
    Ok(())
}
