// Derived display state: status, saturation bands, sort order, cell text.
// Pure functions so thresholds and ordering are testable without a terminal.

use crate::models::HostRecord;
use std::cmp::Ordering;

/// Placeholder for a value the store does not know. Unknown is rendered
/// explicitly, never as zero.
pub const UNKNOWN: &str = "-";

pub const SATURATION_WARNING: f64 = 0.7;
pub const SATURATION_CRITICAL: f64 = 1.0;
pub const MEM_CRITICAL_PCT: f64 = 90.0;
pub const DISK_CRITICAL_PCT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Up,
    Down,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Up => "UP",
            Status::Down => "DOWN",
        }
    }
}

pub fn status(reachable: bool) -> Status {
    if reachable { Status::Up } else { Status::Down }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Normal,
    Warning,
    Critical,
}

/// Load average normalized by core count. A missing or zero core count is
/// treated as one core so the ratio stays defined.
pub fn saturation(cpu_load: f64, cpu_cores: Option<f64>) -> f64 {
    let cores = match cpu_cores {
        Some(c) if c > 0.0 => c,
        _ => 1.0,
    };
    cpu_load / cores
}

pub fn load_band(saturation: f64) -> Band {
    if saturation >= SATURATION_CRITICAL {
        Band::Critical
    } else if saturation >= SATURATION_WARNING {
        Band::Warning
    } else {
        Band::Normal
    }
}

/// Memory has no warning band; it is either fine or critical.
pub fn mem_band(used_pct: f64) -> Band {
    if used_pct >= MEM_CRITICAL_PCT {
        Band::Critical
    } else {
        Band::Normal
    }
}

pub fn disk_band(used_pct: f64) -> Band {
    if used_pct >= DISK_CRITICAL_PCT {
        Band::Critical
    } else {
        Band::Normal
    }
}

pub fn failed_band(count: i64) -> Band {
    if count > 0 { Band::Critical } else { Band::Normal }
}

/// One rendered table cell: text plus the band that styles it. `known`
/// distinguishes a real value from the unknown placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCell {
    pub text: String,
    pub band: Band,
    pub known: bool,
}

impl DisplayCell {
    fn unknown() -> Self {
        Self {
            text: UNKNOWN.into(),
            band: Band::Normal,
            known: false,
        }
    }

    fn plain(text: String) -> Self {
        Self {
            text,
            band: Band::Normal,
            known: true,
        }
    }

    fn banded(text: String, band: Band) -> Self {
        Self {
            text,
            band,
            known: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub hostname: String,
    pub ip: DisplayCell,
    pub status: Status,
    pub os: DisplayCell,
    pub kernel: DisplayCell,
    pub load: DisplayCell,
    pub mem: DisplayCell,
    pub disk: DisplayCell,
    pub failed: DisplayCell,
    pub uptime: DisplayCell,
}

pub fn display_row(record: &HostRecord) -> DisplayRow {
    let opt_text = |v: &Option<String>| match v {
        Some(s) => DisplayCell::plain(s.clone()),
        None => DisplayCell::unknown(),
    };
    DisplayRow {
        hostname: record.hostname.clone(),
        ip: opt_text(&record.ip_address),
        status: status(record.reachable),
        os: opt_text(&record.os_version),
        kernel: opt_text(&record.kernel_version),
        load: match record.cpu_load {
            Some(load) => DisplayCell::banded(
                format!("{load:.2}"),
                load_band(saturation(load, record.cpu_cores)),
            ),
            None => DisplayCell::unknown(),
        },
        mem: match record.mem_used_pct {
            Some(pct) => DisplayCell::banded(format!("{pct:.2}"), mem_band(pct)),
            None => DisplayCell::unknown(),
        },
        disk: match record.disk_used_pct {
            Some(pct) => DisplayCell::banded(format!("{pct:.0}"), disk_band(pct)),
            None => DisplayCell::unknown(),
        },
        failed: match record.failed_services {
            Some(count) => DisplayCell::banded(count.to_string(), failed_band(count)),
            None => DisplayCell::unknown(),
        },
        uptime: opt_text(&record.uptime),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Hostname,
    Ip,
    Status,
    Os,
    Kernel,
    Load,
    Mem,
    Disk,
    Failed,
    Uptime,
}

impl SortColumn {
    /// Keyboard mapping: 1..9 then 0 for the tenth column.
    pub fn from_digit(digit: char) -> Option<Self> {
        Some(match digit {
            '1' => Self::Hostname,
            '2' => Self::Ip,
            '3' => Self::Status,
            '4' => Self::Os,
            '5' => Self::Kernel,
            '6' => Self::Load,
            '7' => Self::Mem,
            '8' => Self::Disk,
            '9' => Self::Failed,
            '0' => Self::Uptime,
            _ => return None,
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hostname => "Hostname",
            Self::Ip => "IP",
            Self::Status => "Status",
            Self::Os => "OS",
            Self::Kernel => "Kernel",
            Self::Load => "CPU Load",
            Self::Mem => "Mem %",
            Self::Disk => "Disk %",
            Self::Failed => "Failed",
            Self::Uptime => "Uptime",
        }
    }
}

/// Default order: reachable hosts first, then ascending hostname. A column
/// sort chosen by the user persists across refresh ticks until cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Default,
    Column {
        column: SortColumn,
        reverse: bool,
    },
}

pub fn sort_records(records: &mut [HostRecord], order: SortOrder) {
    match order {
        SortOrder::Default => records.sort_by(|a, b| {
            b.reachable
                .cmp(&a.reachable)
                .then_with(|| a.hostname.cmp(&b.hostname))
        }),
        SortOrder::Column { column, reverse } => {
            records.sort_by(|a, b| {
                let ord = compare_column(a, b, column)
                    .then_with(|| a.hostname.cmp(&b.hostname));
                if reverse { ord.reverse() } else { ord }
            });
        }
    }
}

fn compare_column(a: &HostRecord, b: &HostRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Hostname => a.hostname.cmp(&b.hostname),
        SortColumn::Ip => cmp_opt(&a.ip_address, &b.ip_address),
        SortColumn::Status => b.reachable.cmp(&a.reachable),
        SortColumn::Os => cmp_opt(&a.os_version, &b.os_version),
        SortColumn::Kernel => cmp_opt(&a.kernel_version, &b.kernel_version),
        SortColumn::Load => cmp_opt_f64(a.cpu_load, b.cpu_load),
        SortColumn::Mem => cmp_opt_f64(a.mem_used_pct, b.mem_used_pct),
        SortColumn::Disk => cmp_opt_f64(a.disk_used_pct, b.disk_used_pct),
        SortColumn::Failed => cmp_opt(&a.failed_services, &b.failed_services),
        SortColumn::Uptime => cmp_opt(&a.uptime, &b.uptime),
    }
}

/// Unknown sorts after known, whatever the direction asked for meant.
fn cmp_opt<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_opt_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
