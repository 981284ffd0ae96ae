// SQLite fleet state. One row per hostname; upsert is a selective merge so a
// degraded poll never erases known-good inventory facts.

use crate::models::{HostRecord, HostSnapshot};
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

pub struct HostsRepo {
    pool: SqlitePool,
}

impl HostsRepo {
    pub async fn connect(path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        // WAL so collector writers never stall the dashboard reader.
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS hosts (
                hostname TEXT PRIMARY KEY,
                ip_address TEXT,
                os_version TEXT,
                kernel_version TEXT,
                cpu_load REAL,
                cpu_cores REAL,
                mem_used_pct REAL,
                disk_used_pct REAL,
                uptime TEXT,
                failed_services INTEGER,
                reachable INTEGER NOT NULL DEFAULT 0,
                last_checked TEXT NOT NULL,
                last_seen TEXT,
                first_seen TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Atomic insert-or-merge for one poll outcome. Merge policy:
    /// - metric fields, reachable, last_checked: always the latest value,
    ///   including NULL ("now unknown") on a degraded snapshot;
    /// - ip_address, os_version, kernel_version, last_seen: only overwritten
    ///   when the snapshot supplies a value;
    /// - first_seen: written once at insert, never touched again.
    #[instrument(skip(self, snapshot), fields(repo = "hosts", operation = "upsert", host = %snapshot.hostname))]
    pub async fn upsert(&self, snapshot: &HostSnapshot) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO hosts (
                hostname, ip_address, os_version, kernel_version,
                cpu_load, cpu_cores, mem_used_pct, disk_used_pct, uptime,
                failed_services, reachable,
                last_checked, last_seen, first_seen
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT(hostname)
            DO UPDATE SET
                ip_address       = COALESCE(excluded.ip_address, hosts.ip_address),
                os_version       = COALESCE(excluded.os_version, hosts.os_version),
                kernel_version   = COALESCE(excluded.kernel_version, hosts.kernel_version),
                cpu_load         = excluded.cpu_load,
                cpu_cores        = excluded.cpu_cores,
                mem_used_pct     = excluded.mem_used_pct,
                disk_used_pct    = excluded.disk_used_pct,
                uptime           = excluded.uptime,
                failed_services  = excluded.failed_services,
                reachable        = excluded.reachable,
                last_checked     = excluded.last_checked,
                last_seen        = COALESCE(excluded.last_seen, hosts.last_seen)
            "#,
        )
        .bind(&snapshot.hostname)
        .bind(&snapshot.ip_address)
        .bind(&snapshot.os_version)
        .bind(&snapshot.kernel_version)
        .bind(snapshot.cpu_load)
        .bind(snapshot.cpu_cores)
        .bind(snapshot.mem_used_pct)
        .bind(snapshot.disk_used_pct)
        .bind(&snapshot.uptime)
        .bind(snapshot.failed_services)
        .bind(snapshot.reachable)
        .bind(snapshot.last_checked)
        .bind(snapshot.last_seen)
        .bind(snapshot.last_checked)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Full fleet in the default display order: reachable hosts first, then
    /// ascending hostname.
    #[instrument(skip(self), fields(repo = "hosts", operation = "load_all"))]
    pub async fn load_all(&self) -> anyhow::Result<Vec<HostRecord>> {
        let rows = sqlx::query(
            "SELECT hostname, ip_address, os_version, kernel_version,
                    cpu_load, cpu_cores, mem_used_pct, disk_used_pct, uptime,
                    failed_services, reachable, last_checked, last_seen, first_seen
             FROM hosts ORDER BY reachable DESC, hostname ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Self::parse_row(&row)?);
        }
        Ok(out)
    }

    pub async fn get(&self, hostname: &str) -> anyhow::Result<Option<HostRecord>> {
        let row = sqlx::query(
            "SELECT hostname, ip_address, os_version, kernel_version,
                    cpu_load, cpu_cores, mem_used_pct, disk_used_pct, uptime,
                    failed_services, reachable, last_checked, last_seen, first_seen
             FROM hosts WHERE hostname = $1",
        )
        .bind(hostname)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::parse_row).transpose()
    }

    fn parse_row(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<HostRecord> {
        Ok(HostRecord {
            hostname: row.try_get("hostname")?,
            ip_address: row.try_get("ip_address")?,
            reachable: row.try_get("reachable")?,
            os_version: row.try_get("os_version")?,
            kernel_version: row.try_get("kernel_version")?,
            cpu_load: row.try_get("cpu_load")?,
            cpu_cores: row.try_get("cpu_cores")?,
            mem_used_pct: row.try_get("mem_used_pct")?,
            disk_used_pct: row.try_get("disk_used_pct")?,
            uptime: row.try_get("uptime")?,
            failed_services: row.try_get("failed_services")?,
            last_checked: row.try_get::<DateTime<Utc>, _>("last_checked")?,
            last_seen: row.try_get::<Option<DateTime<Utc>>, _>("last_seen")?,
            first_seen: row.try_get::<DateTime<Utc>, _>("first_seen")?,
        })
    }
}
