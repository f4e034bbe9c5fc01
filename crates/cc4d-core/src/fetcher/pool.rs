//! Fixed-size worker pool over a shared queue of pending requests.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Mutex;

use super::request::{BatchProgress, TransferOutcome, TransferRequest, TransferStatus};
use super::transfer::{self, Fetched};
use super::FetchConfig;
use crate::retry::{run_with_retry, TransferError};

/// Runs every request on at most `cfg.concurrency` worker threads and returns
/// one outcome per request, in input order. Each worker takes the next pending
/// request only after finishing its current one, so the number of requests in
/// flight never exceeds the pool size.
pub(super) fn run_pool(
    requests: &[TransferRequest],
    cfg: &FetchConfig,
    progress_tx: Option<&tokio::sync::mpsc::Sender<BatchProgress>>,
) -> Vec<TransferOutcome> {
    let total = requests.len();
    let work: Mutex<VecDeque<(usize, &TransferRequest)>> =
        Mutex::new(requests.iter().enumerate().collect());
    let num_workers = cfg.concurrency.min(total);
    let mut slots: Vec<Option<TransferOutcome>> = (0..total).map(|_| None).collect();

    std::thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<(usize, TransferOutcome)>();
        for worker in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            scope.spawn(move || {
                tracing::debug!(worker, "fetch worker started");
                loop {
                    // Queue lock is released before the transfer starts.
                    let next = work
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .pop_front();
                    let Some((index, request)) = next else {
                        break;
                    };
                    let outcome = guard_panics(request, || process_one(request, cfg));
                    if tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
                tracing::debug!(worker, "fetch worker finished");
            });
        }
        drop(tx);

        let mut progress = BatchProgress {
            done: 0,
            total,
            failed: 0,
        };
        for (index, outcome) in rx {
            progress.done += 1;
            if outcome.status == TransferStatus::Failed {
                progress.failed += 1;
            }
            log_outcome(&outcome, progress);
            if let Some(progress_tx) = progress_tx {
                let _ = progress_tx.try_send(progress);
            }
            slots[index] = Some(outcome);
        }
    });

    slots
        .into_iter()
        .zip(requests)
        .map(|(slot, request)| {
            slot.unwrap_or_else(|| {
                TransferOutcome::failed(request.clone(), TransferError::WorkerLost, 0)
            })
        })
        .collect()
}

/// Runs `f` for `request`, turning a panic into a `WorkerLost` failure so the
/// worker keeps draining the queue and the batch still gets one outcome per request.
fn guard_panics<F>(request: &TransferRequest, f: F) -> TransferOutcome
where
    F: FnOnce() -> TransferOutcome,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::error!(
                "transfer of {} panicked",
                request.destination_path.display()
            );
            TransferOutcome::failed(request.clone(), TransferError::WorkerLost, 0)
        }
    }
}

/// Resume check, GET with retry and streamed write for one request.
fn process_one(request: &TransferRequest, cfg: &FetchConfig) -> TransferOutcome {
    let label = request.destination_path.display().to_string();
    let attempted = run_with_retry(&cfg.retry, &label, || {
        transfer::fetch_once(request, cfg.chunk_size, cfg.curl)
    });
    match attempted.result {
        Ok(Fetched::Skipped { .. }) => TransferOutcome::skipped(request.clone(), attempted.attempts),
        Ok(Fetched::Written { bytes }) => {
            TransferOutcome::completed(request.clone(), bytes, attempted.attempts)
        }
        Err(e) => TransferOutcome::failed(request.clone(), e, attempted.attempts),
    }
}

fn log_outcome(outcome: &TransferOutcome, progress: BatchProgress) {
    let dest = outcome.request.destination_path.display();
    match (&outcome.status, &outcome.error) {
        (TransferStatus::Failed, Some(e)) => tracing::warn!(
            "[{}/{}] {} failed after {} attempt(s): {}",
            progress.done,
            progress.total,
            dest,
            outcome.attempts,
            e
        ),
        _ => tracing::info!(
            "[{}/{}] {} {} ({} bytes)",
            progress.done,
            progress.total,
            dest,
            outcome.status,
            outcome.bytes_written
        ),
    }
}
