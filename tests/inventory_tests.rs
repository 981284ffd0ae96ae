// Inventory file parsing tests

use fleetmon::inventory::{load_hosts, parse_hosts};

#[test]
fn parses_hostnames_skipping_blanks_and_comments() {
    let text = "\
# fleet inventory
web01

db02.internal
  app03
# trailing comment
";
    assert_eq!(parse_hosts(text), vec!["web01", "db02.internal", "app03"]);
}

#[test]
fn preserves_order_and_drops_duplicates() {
    let text = "b\na\nb\nc\na\n";
    assert_eq!(parse_hosts(text), vec!["b", "a", "c"]);
}

#[test]
fn empty_file_yields_no_hosts() {
    assert!(parse_hosts("").is_empty());
    assert!(parse_hosts("# only comments\n\n").is_empty());
}

#[test]
fn load_hosts_reads_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("servers.txt");
    std::fs::write(&path, "web01\n# skip\ndb02\n").unwrap();
    assert_eq!(load_hosts(&path).unwrap(), vec!["web01", "db02"]);
}

#[test]
fn load_hosts_missing_file_names_the_path() {
    let err = load_hosts("/nonexistent/servers.txt").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/servers.txt"));
}
