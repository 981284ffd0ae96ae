// Interactive fleet dashboard; runs until explicit quit.

use anyhow::Result;
use fleetmon::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // The terminal is in raw/alternate-screen mode, so logs are opt-in and
    // go to stderr (redirect to a file when debugging).
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let app_config = config::AppConfig::load_or_default();
    let repo = hosts_repo::HostsRepo::connect(&app_config.database.path).await?;
    repo.init().await?;

    dashboard::Dashboard::new(repo, app_config.refresh_interval())
        .run()
        .await
}
