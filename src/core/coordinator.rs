// src/core/coordinator.rs

//! Fans a target list out over concurrent host scans.
//!
//! Host tasks never touch shared state. Each one sends its probe events and
//! its final result over a channel; the caller's task is the only collector,
//! so results and progress are owned by a single place and need no lock.

use crate::core::models::{ScanResult, Target};
use crate::core::progress::Progress;
use crate::core::scanner::{HostScanner, ProbeEvent};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

/// What the collector receives from the host tasks.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    Probe(ProbeEvent),
    /// Sent once per target, `index` being its position in the target list.
    HostFinished { index: usize, result: ScanResult },
}

/// Scans every target and returns one result per target, in target order.
///
/// At most `concurrency` hosts are in flight at once (`0` lifts the limit).
/// `on_event` sees every probe and every finished host as they arrive. A host
/// task that dies without reporting still gets a result, with its probes
/// marked failed, so the output always has exactly one entry per target.
pub async fn run_scan<F>(
    scanner: HostScanner,
    targets: Vec<Target>,
    progress: &mut Progress,
    mut on_event: F,
) -> Vec<ScanResult>
where
    F: FnMut(&ScanEvent),
{
    let total = targets.len();
    let mode = scanner.config().mode;
    let targets: Arc<[Target]> = targets.into();
    info!(total, concurrency = scanner.config().concurrency, "Starting scan run.");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = tokio::spawn(dispatch(scanner, Arc::clone(&targets), tx));

    let mut slots: Vec<Option<ScanResult>> = (0..total).map(|_| None).collect();
    while let Some(event) = rx.recv().await {
        on_event(&event);
        if let ScanEvent::HostFinished { index, result } = event {
            match slots.get_mut(index) {
                Some(slot @ None) => {
                    *slot = Some(result);
                    record_completion(progress);
                }
                Some(Some(_)) => warn!(index, "Duplicate result ignored."),
                None => warn!(index, "Result for unknown target ignored."),
            }
        }
    }

    if let Err(e) = dispatcher.await {
        error!(error = %e, "Dispatcher task failed.");
    }

    let results: Vec<ScanResult> = slots
        .into_iter()
        .zip(targets.iter())
        .enumerate()
        .map(|(index, (slot, target))| match slot {
            Some(result) => result,
            None => {
                warn!(target = %target, "Host scan ended without a result.");
                let result = ScanResult::unreported(target, mode, "scan task ended without reporting");
                on_event(&ScanEvent::HostFinished { index, result: result.clone() });
                record_completion(progress);
                result
            }
        })
        .collect();

    info!(results = results.len(), "Scan run finished.");
    results
}

fn record_completion(progress: &mut Progress) {
    if let Err(e) = progress.advance() {
        warn!(error = %e, "Ignoring extra completion.");
    }
}

/// Spawns one task per target, waiting for a free permit before each spawn so
/// large ranges do not open every socket at once.
async fn dispatch(scanner: HostScanner, targets: Arc<[Target]>, tx: mpsc::UnboundedSender<ScanEvent>) {
    let limit = match scanner.config().concurrency {
        0 => Semaphore::MAX_PERMITS,
        n => n,
    };
    let permits = Arc::new(Semaphore::new(limit));

    for (index, target) in targets.iter().cloned().enumerate() {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            error!("Worker pool closed, no more hosts will be scanned.");
            break;
        };
        let scanner = scanner.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let probe_tx = tx.clone();
            let result = scanner
                .scan(&target, move |event| {
                    let _ = probe_tx.send(ScanEvent::Probe(event));
                })
                .await;
            if tx.send(ScanEvent::HostFinished { index, result }).is_err() {
                debug!(target = %target, "Collector gone before the result was sent.");
            }
        });
    }
    debug!("All host tasks dispatched.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ProbeTimeouts, RunConfig, ScanMode};
    use crate::core::progress::ProgressState;
    use std::collections::HashSet;
    use std::time::Duration;

    fn scanner(concurrency: usize) -> HostScanner {
        let config = RunConfig {
            mode: ScanMode::Selective,
            concurrency,
            timeouts: ProbeTimeouts {
                ping: Duration::from_secs(1),
                tcp: Duration::from_millis(500),
                tls: Duration::from_millis(500),
                http: Duration::from_millis(500),
            },
            ..RunConfig::default()
        };
        HostScanner::new(Arc::new(config)).unwrap()
    }

    fn targets(n: usize) -> Vec<Target> {
        // Port 1 on loopback: refused immediately on any sane test machine.
        (0..n).map(|i| Target::new(format!("127.0.0.{}", i + 1), 1)).collect()
    }

    #[tokio::test]
    async fn one_result_per_target() {
        let targets = targets(12);
        let mut progress = Progress::hidden(targets.len());

        let results = run_scan(scanner(4), targets.clone(), &mut progress, |_| {}).await;

        assert_eq!(results.len(), targets.len());
        let hosts: HashSet<_> = results.iter().map(|r| r.host.clone()).collect();
        assert_eq!(hosts.len(), targets.len());
        for (result, target) in results.iter().zip(&targets) {
            assert_eq!(result.host, target.host);
        }
        assert_eq!(progress.state(), ProgressState::Done { total: 12 });
    }

    #[tokio::test]
    async fn unbounded_pool_still_reports_everything() {
        let targets = targets(5);
        let mut progress = Progress::hidden(targets.len());
        let mut finished = 0;

        let results = run_scan(scanner(0), targets, &mut progress, |event| {
            if matches!(event, ScanEvent::HostFinished { .. }) {
                finished += 1;
            }
        })
        .await;

        assert_eq!(results.len(), 5);
        assert_eq!(finished, 5);
        assert!(progress.is_done());
    }

    #[tokio::test]
    async fn empty_target_list_returns_nothing() {
        let mut progress = Progress::hidden(0);
        let results = run_scan(scanner(4), Vec::new(), &mut progress, |_| {}).await;
        assert!(results.is_empty());
        assert!(progress.is_done());
    }
}
