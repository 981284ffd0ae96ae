use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub files: FilesConfig,
    pub ssh: SshConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "fleetmon.db".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub servers_list: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            servers_list: "servers.txt".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub user: String,
    /// Per-connection timeout in seconds.
    pub timeout: u64,
    /// Concurrency bound for the poll fan-out.
    pub max_workers: usize,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            user: "monitor".into(),
            timeout: 5,
            max_workers: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Dashboard refresh interval in seconds.
    pub refresh_interval: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_interval: 60,
        }
    }
}

impl AppConfig {
    /// Load from CONFIG_FILE (default config.toml). A missing, unreadable,
    /// or invalid config falls back to the built-in defaults; the process
    /// never fails over configuration.
    pub fn load_or_default() -> Self {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, path = %path, "config not readable, using built-in defaults");
                return Self::default();
            }
        };
        match Self::load_from_str(&s) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, path = %path, "invalid config, using built-in defaults");
                Self::default()
            }
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            !self.files.servers_list.is_empty(),
            "files.servers_list must be non-empty"
        );
        anyhow::ensure!(!self.ssh.user.is_empty(), "ssh.user must be non-empty");
        anyhow::ensure!(
            self.ssh.timeout > 0,
            "ssh.timeout must be > 0, got {}",
            self.ssh.timeout
        );
        anyhow::ensure!(
            self.ssh.max_workers > 0,
            "ssh.max_workers must be > 0, got {}",
            self.ssh.max_workers
        );
        anyhow::ensure!(
            self.ui.refresh_interval > 0,
            "ui.refresh_interval must be > 0, got {}",
            self.ui.refresh_interval
        );
        Ok(())
    }

    pub fn ssh_timeout(&self) -> Duration {
        Duration::from_secs(self.ssh.timeout)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.ui.refresh_interval)
    }
}
