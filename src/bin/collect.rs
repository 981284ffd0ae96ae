// One poll pass over the full inventory, then exit. Meant to be driven by
// cron or a systemd timer; the dashboard reads whatever this wrote.

use anyhow::Result;
use fleetmon::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load_or_default();
    let hosts = inventory::load_hosts(&app_config.files.servers_list)?;

    let repo = hosts_repo::HostsRepo::connect(&app_config.database.path).await?;
    repo.init().await?;

    let collector = Arc::new(collector::SshCollector::new(
        app_config.ssh.user.clone(),
        app_config.ssh_timeout(),
    ));

    tracing::info!(
        version = version::VERSION,
        hosts = hosts.len(),
        max_workers = app_config.ssh.max_workers,
        "starting poll pass"
    );

    let summary = scheduler::run_poll(hosts, app_config.ssh.max_workers, &repo, {
        let collector = collector.clone();
        move |host| {
            let collector = collector.clone();
            async move { collector.collect(host).await }
        }
    })
    .await;

    tracing::info!(
        hosts = summary.hosts,
        reachable = summary.reachable,
        unreachable = summary.unreachable,
        store_failures = summary.store_failures,
        "poll pass complete"
    );

    anyhow::ensure!(
        summary.store_failures == 0,
        "{} host record writes failed",
        summary.store_failures
    );
    Ok(())
}
