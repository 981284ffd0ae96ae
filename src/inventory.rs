// Host inventory file: one hostname per line, '#' comments and blanks ignored

use std::collections::HashSet;
use std::path::Path;

pub fn load_hosts(path: impl AsRef<Path>) -> anyhow::Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading inventory {}: {}", path.display(), e))?;
    Ok(parse_hosts(&text))
}

/// Order-preserving; repeated hostnames are kept once so a sloppy inventory
/// cannot make the scheduler poll a host twice in one pass.
pub fn parse_hosts(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(line.to_string()))
        .map(str::to_string)
        .collect()
}
