// Shared test helpers

use chrono::{DateTime, TimeZone, Utc};
use fleetmon::models::{HostMetrics, HostSnapshot};

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn sample_metrics() -> HostMetrics {
    HostMetrics {
        cpu_load: 0.42,
        cpu_cores: 4.0,
        mem_used_pct: 37.25,
        disk_used_pct: 61.0,
        uptime: "up 2 weeks, 3 days".into(),
        failed_services: 0,
        kernel_version: "6.8.0-45-generic".into(),
        os_version: "Ubuntu 24.04.1 LTS".into(),
    }
}

pub fn full_snapshot(hostname: &str, polled_at: DateTime<Utc>) -> HostSnapshot {
    HostSnapshot::full(
        hostname.into(),
        Some("192.0.2.10".into()),
        sample_metrics(),
        polled_at,
    )
}

pub fn degraded_snapshot(hostname: &str, polled_at: DateTime<Utc>) -> HostSnapshot {
    HostSnapshot::degraded(hostname.into(), None, polled_at)
}
