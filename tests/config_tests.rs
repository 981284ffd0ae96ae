// Config parsing, defaulting, and validation tests

use fleetmon::config::AppConfig;

const VALID_CONFIG: &str = r#"
[database]
path = "data/fleet.db"

[files]
servers_list = "servers.txt"

[ssh]
user = "ops"
timeout = 3
max_workers = 20

[ui]
refresh_interval = 30
"#;

#[test]
fn loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.database.path, "data/fleet.db");
    assert_eq!(config.files.servers_list, "servers.txt");
    assert_eq!(config.ssh.user, "ops");
    assert_eq!(config.ssh.timeout, 3);
    assert_eq!(config.ssh.max_workers, 20);
    assert_eq!(config.ui.refresh_interval, 30);
    assert_eq!(config.ssh_timeout(), std::time::Duration::from_secs(3));
    assert_eq!(config.refresh_interval(), std::time::Duration::from_secs(30));
}

#[test]
fn empty_config_yields_defaults() {
    let config = AppConfig::load_from_str("").expect("empty config is valid");
    assert_eq!(config.database.path, "fleetmon.db");
    assert_eq!(config.ssh.timeout, 5);
    assert_eq!(config.ssh.max_workers, 10);
    assert_eq!(config.ui.refresh_interval, 60);
}

#[test]
fn partial_config_keeps_defaults_for_missing_sections() {
    let config = AppConfig::load_from_str("[ssh]\nmax_workers = 4\n").unwrap();
    assert_eq!(config.ssh.max_workers, 4);
    // Untouched keys in the same section still default
    assert_eq!(config.ssh.timeout, 5);
    assert_eq!(config.database.path, "fleetmon.db");
}

#[test]
fn rejects_empty_database_path() {
    let bad = VALID_CONFIG.replace("path = \"data/fleet.db\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("database.path"));
}

#[test]
fn rejects_zero_timeout() {
    let bad = VALID_CONFIG.replace("timeout = 3", "timeout = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("ssh.timeout"));
}

#[test]
fn rejects_zero_max_workers() {
    let bad = VALID_CONFIG.replace("max_workers = 20", "max_workers = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("ssh.max_workers"));
}

#[test]
fn rejects_zero_refresh_interval() {
    let bad = VALID_CONFIG.replace("refresh_interval = 30", "refresh_interval = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("ui.refresh_interval"));
}

#[test]
fn rejects_malformed_toml() {
    assert!(AppConfig::load_from_str("not toml [").is_err());
}
