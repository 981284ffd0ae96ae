// Remote diagnostic wire protocol: exactly eight `KEY value` lines

use super::CollectError;
use crate::models::HostMetrics;
use std::collections::HashMap;

/// The fixed diagnostic script run on every host. Each echo produces one
/// `KEY value` line; keys may arrive in any order.
pub const DIAG_SCRIPT: &str = r#"
echo LOAD $(awk '{print $1}' /proc/loadavg)
echo CORES $(nproc)
echo MEM $(free | awk '/Mem:/ {printf "%.2f", $3/$2*100}')
echo DISK $(df / | awk 'END {print $5}' | tr -d '%')
echo UPTIME $(uptime -p)
echo FAILED $(systemctl --failed --no-legend | wc -l)
echo KERNEL $(uname -r)
echo OS $(. /etc/os-release && echo "$PRETTY_NAME")
"#;

/// Parse one diagnostic run. All eight keys must be present and well-formed;
/// anything less fails the whole report so partial metrics never escape.
pub fn parse_report(output: &str) -> Result<HostMetrics, CollectError> {
    let mut fields: HashMap<&str, &str> = HashMap::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(' ') else {
            return Err(CollectError::Protocol(format!(
                "unparseable line {line:?}"
            )));
        };
        fields.insert(key, value.trim());
    }

    Ok(HostMetrics {
        cpu_load: req_f64(&fields, "LOAD")?,
        cpu_cores: req_f64(&fields, "CORES")?,
        mem_used_pct: req_f64(&fields, "MEM")?,
        disk_used_pct: req_f64(&fields, "DISK")?,
        uptime: req(&fields, "UPTIME")?.to_string(),
        failed_services: req_i64(&fields, "FAILED")?,
        kernel_version: req(&fields, "KERNEL")?.to_string(),
        os_version: req(&fields, "OS")?.to_string(),
    })
}

fn req<'a>(fields: &HashMap<&str, &'a str>, key: &str) -> Result<&'a str, CollectError> {
    fields
        .get(key)
        .copied()
        .ok_or_else(|| CollectError::Protocol(format!("missing key {key}")))
}

fn req_f64(fields: &HashMap<&str, &str>, key: &str) -> Result<f64, CollectError> {
    let raw = req(fields, key)?;
    raw.parse()
        .map_err(|_| CollectError::Protocol(format!("bad {key} value {raw:?}")))
}

fn req_i64(fields: &HashMap<&str, &str>, key: &str) -> Result<i64, CollectError> {
    let raw = req(fields, key)?;
    raw.parse()
        .map_err(|_| CollectError::Protocol(format!("bad {key} value {raw:?}")))
}
