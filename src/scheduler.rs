// Bounded poll fan-out: one task per host, at most N in flight, results
// reconciled into the store as they arrive (no completion ordering).

use crate::hosts_repo::HostsRepo;
use crate::models::HostSnapshot;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub hosts: usize,
    pub reachable: usize,
    pub unreachable: usize,
    /// Upserts that failed; surfaced to the caller, never retried here.
    pub store_failures: usize,
}

/// Poll every host and upsert each outcome. `collect` is the per-host probe;
/// it must never fail (failures are degraded snapshots). Tasks share no
/// mutable state; one host timing out cannot delay or cancel another.
pub async fn run_poll<F, Fut>(
    hosts: Vec<String>,
    max_workers: usize,
    repo: &HostsRepo,
    collect: F,
) -> PollSummary
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = HostSnapshot> + Send + 'static,
{
    let sem = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut tasks = JoinSet::new();
    let mut summary = PollSummary {
        hosts: hosts.len(),
        ..Default::default()
    };

    for host in hosts {
        let sem = sem.clone();
        let probe = collect(host);
        tasks.spawn(async move {
            // The probe does no work until polled, so the permit bounds the
            // number of in-flight sessions.
            let _permit = sem.acquire_owned().await.expect("semaphore closed");
            probe.await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let snapshot = match joined {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "poll task did not complete");
                continue;
            }
        };
        if snapshot.reachable {
            summary.reachable += 1;
        } else {
            summary.unreachable += 1;
        }
        if let Err(e) = repo.upsert(&snapshot).await {
            error!(host = %snapshot.hostname, error = %e, "host record write failed");
            summary.store_failures += 1;
        }
    }

    summary
}
