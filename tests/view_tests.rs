// Derived display state tests: saturation, bands, unknown rendering, sort

use chrono::{TimeZone, Utc};
use fleetmon::dashboard::view::{
    Band, SortColumn, SortOrder, Status, UNKNOWN, disk_band, display_row, failed_band, load_band,
    mem_band, saturation, sort_records, status,
};
use fleetmon::models::HostRecord;

fn record(hostname: &str, reachable: bool) -> HostRecord {
    HostRecord {
        hostname: hostname.into(),
        ip_address: Some("192.0.2.10".into()),
        reachable,
        os_version: Some("Debian GNU/Linux 12".into()),
        kernel_version: Some("6.1.0-25-amd64".into()),
        cpu_load: Some(0.42),
        cpu_cores: Some(4.0),
        mem_used_pct: Some(37.25),
        disk_used_pct: Some(61.0),
        uptime: Some("up 5 days".into()),
        failed_services: Some(0),
        last_checked: Utc.timestamp_opt(1_000, 0).unwrap(),
        last_seen: Some(Utc.timestamp_opt(1_000, 0).unwrap()),
        first_seen: Utc.timestamp_opt(500, 0).unwrap(),
    }
}

fn degraded_record(hostname: &str) -> HostRecord {
    HostRecord {
        ip_address: None,
        os_version: None,
        kernel_version: None,
        cpu_load: None,
        cpu_cores: None,
        mem_used_pct: None,
        disk_used_pct: None,
        uptime: None,
        failed_services: None,
        last_seen: None,
        ..record(hostname, false)
    }
}

#[test]
fn saturation_normalizes_by_cores() {
    assert_eq!(saturation(2.0, Some(2.0)), 1.0);
    assert_eq!(saturation(0.42, Some(4.0)), 0.105);
    assert_eq!(saturation(1.4, Some(2.0)), 0.7);
}

#[test]
fn saturation_treats_missing_or_zero_cores_as_one() {
    assert_eq!(saturation(0.5, None), 0.5);
    assert_eq!(saturation(0.5, Some(0.0)), 0.5);
    assert_eq!(saturation(0.5, Some(-1.0)), 0.5);
}

#[test]
fn load_bands_at_thresholds() {
    assert_eq!(load_band(saturation(2.0, Some(2.0))), Band::Critical);
    assert_eq!(load_band(saturation(0.42, Some(4.0))), Band::Normal);
    assert_eq!(load_band(0.7), Band::Warning);
    assert_eq!(load_band(0.69), Band::Normal);
    assert_eq!(load_band(1.0), Band::Critical);
}

#[test]
fn mem_and_disk_have_no_warning_band() {
    assert_eq!(mem_band(89.99), Band::Normal);
    assert_eq!(mem_band(90.0), Band::Critical);
    assert_eq!(disk_band(89.0), Band::Normal);
    assert_eq!(disk_band(90.0), Band::Critical);
}

#[test]
fn any_failed_service_is_critical() {
    assert_eq!(failed_band(0), Band::Normal);
    assert_eq!(failed_band(1), Band::Critical);
}

#[test]
fn status_follows_reachable() {
    assert_eq!(status(true), Status::Up);
    assert_eq!(status(false), Status::Down);
    assert_eq!(Status::Up.label(), "UP");
    assert_eq!(Status::Down.label(), "DOWN");
}

#[test]
fn display_row_formats_known_values() {
    let row = display_row(&record("web01", true));
    assert_eq!(row.load.text, "0.42");
    assert_eq!(row.load.band, Band::Normal);
    assert_eq!(row.mem.text, "37.25");
    assert_eq!(row.disk.text, "61");
    assert_eq!(row.failed.text, "0");
    assert!(row.failed.known);
}

#[test]
fn display_row_renders_unknown_placeholders_not_zero() {
    let row = display_row(&degraded_record("db02"));
    assert_eq!(row.status, Status::Down);
    for cell in [
        &row.ip, &row.os, &row.kernel, &row.load, &row.mem, &row.disk, &row.failed, &row.uptime,
    ] {
        assert_eq!(cell.text, UNKNOWN);
        assert!(!cell.known);
        // Unknown never styles as a threshold breach
        assert_eq!(cell.band, Band::Normal);
    }
}

#[test]
fn high_load_on_degraded_cores_still_bands() {
    let mut r = record("web01", true);
    r.cpu_load = Some(1.5);
    r.cpu_cores = None;
    let row = display_row(&r);
    assert_eq!(row.load.band, Band::Critical);
}

#[test]
fn default_sort_reachable_first_then_hostname() {
    let mut records = vec![
        record("web01", true),
        record("db02", false),
        record("app03", true),
    ];
    sort_records(&mut records, SortOrder::Default);
    let names: Vec<&str> = records.iter().map(|r| r.hostname.as_str()).collect();
    assert_eq!(names, vec!["app03", "web01", "db02"]);
}

#[test]
fn column_sort_orders_by_value_with_unknown_last() {
    let mut a = record("a", true);
    a.cpu_load = Some(2.0);
    let mut b = record("b", true);
    b.cpu_load = Some(0.1);
    let c = degraded_record("c");

    let mut records = vec![a, c, b];
    sort_records(
        &mut records,
        SortOrder::Column {
            column: SortColumn::Load,
            reverse: false,
        },
    );
    let names: Vec<&str> = records.iter().map(|r| r.hostname.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "c"], "unknown load sorts last");
}

#[test]
fn column_sort_reverse_flips_known_values() {
    let mut a = record("a", true);
    a.mem_used_pct = Some(10.0);
    let mut b = record("b", true);
    b.mem_used_pct = Some(95.0);

    let mut records = vec![a, b];
    sort_records(
        &mut records,
        SortOrder::Column {
            column: SortColumn::Mem,
            reverse: true,
        },
    );
    assert_eq!(records[0].hostname, "b");
}

#[test]
fn digit_keys_map_to_columns() {
    assert_eq!(SortColumn::from_digit('1'), Some(SortColumn::Hostname));
    assert_eq!(SortColumn::from_digit('6'), Some(SortColumn::Load));
    assert_eq!(SortColumn::from_digit('0'), Some(SortColumn::Uptime));
    assert_eq!(SortColumn::from_digit('x'), None);
}
