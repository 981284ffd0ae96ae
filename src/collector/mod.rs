// SSH metric collection, one blocking session round trip per host

mod parse;

pub use parse::{DIAG_SCRIPT, parse_report};

use crate::models::{HostMetrics, HostSnapshot};
use chrono::Utc;
use ssh2::{CheckResult, KnownHostFileKind, Session};
use std::io::Read;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

const SSH_PORT: u16 = 22;

/// Why a poll attempt failed. Every variant collapses to a degraded
/// snapshot; only the cause reported to the log differs.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("name resolution failed: {0}")]
    Resolve(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("host key rejected: {0}")]
    HostKey(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("remote execution failed: {0}")]
    Exec(String),
    #[error("protocol violation: {0}")]
    Protocol(String),
}

#[derive(Debug, Clone)]
pub struct SshCollector {
    user: String,
    timeout: Duration,
}

impl SshCollector {
    pub fn new(user: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user: user.into(),
            timeout,
        }
    }

    /// One poll attempt. Never fails past this boundary: any error is logged
    /// with its cause and collapses to a degraded snapshot. The blocking
    /// session round trip runs on the blocking pool.
    pub async fn collect(&self, hostname: String) -> HostSnapshot {
        let this = self.clone();
        let host = hostname.clone();
        let outcome =
            tokio::task::spawn_blocking(move || this.collect_blocking(&host)).await;
        let polled_at = Utc::now();
        match outcome {
            Ok(Ok((ip, metrics))) => HostSnapshot::full(hostname, ip, metrics, polled_at),
            Ok(Err((ip, e))) => {
                warn!(host = %hostname, error = %e, "poll failed, recording unreachable");
                HostSnapshot::degraded(hostname, ip, polled_at)
            }
            Err(e) => {
                warn!(host = %hostname, error = %e, "collector task join failed");
                HostSnapshot::degraded(hostname, None, polled_at)
            }
        }
    }

    /// Resolution happens first so a failed session still records the IP it
    /// connected to (or None when resolution itself failed).
    fn collect_blocking(
        &self,
        hostname: &str,
    ) -> Result<(Option<String>, HostMetrics), (Option<String>, CollectError)> {
        let addr = match resolve(hostname) {
            Ok(addr) => addr,
            Err(e) => return Err((None, e)),
        };
        let ip = Some(addr.ip().to_string());
        match self.run_session(hostname, addr) {
            Ok(metrics) => Ok((ip, metrics)),
            Err(e) => Err((ip, e)),
        }
    }

    fn run_session(&self, hostname: &str, addr: SocketAddr) -> Result<HostMetrics, CollectError> {
        let tcp = TcpStream::connect_timeout(&addr, self.timeout)
            .map_err(|e| CollectError::Connect(e.to_string()))?;
        tcp.set_read_timeout(Some(self.timeout))
            .map_err(|e| CollectError::Connect(e.to_string()))?;
        tcp.set_write_timeout(Some(self.timeout))
            .map_err(|e| CollectError::Connect(e.to_string()))?;

        let mut sess = Session::new().map_err(|e| CollectError::Connect(e.to_string()))?;
        sess.set_timeout(self.timeout.as_millis() as u32);
        sess.set_tcp_stream(tcp);
        sess.handshake()
            .map_err(|e| CollectError::Connect(e.to_string()))?;

        verify_host_key(&sess, hostname)?;
        self.authenticate(&sess)?;

        let mut channel = sess
            .channel_session()
            .map_err(|e| CollectError::Exec(e.to_string()))?;
        channel
            .exec(DIAG_SCRIPT)
            .map_err(|e| CollectError::Exec(e.to_string()))?;
        let mut output = String::new();
        channel
            .read_to_string(&mut output)
            .map_err(|e| CollectError::Exec(e.to_string()))?;
        let _ = channel.wait_close();

        parse_report(&output)
    }

    /// Agent first, then the default key files. No password path.
    fn authenticate(&self, sess: &Session) -> Result<(), CollectError> {
        if sess.userauth_agent(&self.user).is_ok() && sess.authenticated() {
            return Ok(());
        }
        for name in ["id_ed25519", "id_rsa"] {
            let Some(key) = ssh_dir().map(|d| d.join(name)) else {
                continue;
            };
            if !key.exists() {
                continue;
            }
            if sess
                .userauth_pubkey_file(&self.user, None, &key, None)
                .is_ok()
                && sess.authenticated()
            {
                return Ok(());
            }
        }
        Err(CollectError::Auth(format!(
            "no accepted credentials for user {}",
            self.user
        )))
    }
}

/// Best-effort DNS; the scheduler records a null IP when this fails.
fn resolve(hostname: &str) -> Result<SocketAddr, CollectError> {
    (hostname, SSH_PORT)
        .to_socket_addrs()
        .map_err(|e| CollectError::Resolve(e.to_string()))?
        .next()
        .ok_or_else(|| CollectError::Resolve(format!("no addresses for {hostname}")))
}

/// Only already-trusted host keys are accepted. Unknown or mismatched keys
/// are hard rejections with no fallback trust path.
fn verify_host_key(sess: &Session, hostname: &str) -> Result<(), CollectError> {
    let (key, _key_type) = sess
        .host_key()
        .ok_or_else(|| CollectError::HostKey("server sent no host key".into()))?;

    let mut known = sess
        .known_hosts()
        .map_err(|e| CollectError::HostKey(e.to_string()))?;
    let path = ssh_dir()
        .map(|d| d.join("known_hosts"))
        .ok_or_else(|| CollectError::HostKey("cannot locate known_hosts (no HOME)".into()))?;
    known
        .read_file(&path, KnownHostFileKind::OpenSSH)
        .map_err(|e| CollectError::HostKey(format!("{}: {}", path.display(), e)))?;

    match known.check_port(hostname, SSH_PORT, key) {
        CheckResult::Match => Ok(()),
        CheckResult::NotFound => Err(CollectError::HostKey(format!(
            "{hostname} not in known_hosts"
        ))),
        CheckResult::Mismatch => Err(CollectError::HostKey(format!(
            "host key mismatch for {hostname}"
        ))),
        CheckResult::Failure => Err(CollectError::HostKey(format!(
            "host key check failed for {hostname}"
        ))),
    }
}

fn ssh_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".ssh"))
}
