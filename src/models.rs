// Fleet domain models: persistent host records and per-poll snapshots

use chrono::{DateTime, Utc};

/// Metrics parsed from one successful diagnostic run on a remote host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostMetrics {
    pub cpu_load: f64,
    pub cpu_cores: f64,
    pub mem_used_pct: f64,
    pub disk_used_pct: f64,
    pub uptime: String,
    pub failed_services: i64,
    pub kernel_version: String,
    pub os_version: String,
}

/// One poll attempt's outcome for one host. A full snapshot carries every
/// metric; a degraded one carries only hostname, optional IP, and the poll
/// time. `None` means "unknown", distinct from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSnapshot {
    pub hostname: String,
    pub ip_address: Option<String>,
    pub reachable: bool,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub cpu_load: Option<f64>,
    pub cpu_cores: Option<f64>,
    pub mem_used_pct: Option<f64>,
    pub disk_used_pct: Option<f64>,
    pub uptime: Option<String>,
    pub failed_services: Option<i64>,
    pub last_checked: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl HostSnapshot {
    pub fn full(
        hostname: String,
        ip_address: Option<String>,
        metrics: HostMetrics,
        polled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            hostname,
            ip_address,
            reachable: true,
            os_version: Some(metrics.os_version),
            kernel_version: Some(metrics.kernel_version),
            cpu_load: Some(metrics.cpu_load),
            cpu_cores: Some(metrics.cpu_cores),
            mem_used_pct: Some(metrics.mem_used_pct),
            disk_used_pct: Some(metrics.disk_used_pct),
            uptime: Some(metrics.uptime),
            failed_services: Some(metrics.failed_services),
            last_checked: polled_at,
            last_seen: Some(polled_at),
        }
    }

    pub fn degraded(hostname: String, ip_address: Option<String>, polled_at: DateTime<Utc>) -> Self {
        Self {
            hostname,
            ip_address,
            reachable: false,
            os_version: None,
            kernel_version: None,
            cpu_load: None,
            cpu_cores: None,
            mem_used_pct: None,
            disk_used_pct: None,
            uptime: None,
            failed_services: None,
            last_checked: polled_at,
            last_seen: None,
        }
    }
}

/// Persistent state for one host, keyed by hostname.
#[derive(Debug, Clone, PartialEq)]
pub struct HostRecord {
    pub hostname: String,
    pub ip_address: Option<String>,
    pub reachable: bool,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub cpu_load: Option<f64>,
    pub cpu_cores: Option<f64>,
    pub mem_used_pct: Option<f64>,
    pub disk_used_pct: Option<f64>,
    pub uptime: Option<String>,
    pub failed_services: Option<i64>,
    pub last_checked: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
    pub first_seen: DateTime<Utc>,
}
