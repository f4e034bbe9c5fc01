//! Batch progress printer fed by the fetcher's progress channel.

use cc4d_core::fetcher::BatchProgress;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Prints at most one line per interval, plus the final snapshot. Ends when
/// every sender is dropped.
pub fn spawn_printer(mut progress_rx: Receiver<BatchProgress>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        while let Some(p) = progress_rx.recv().await {
            let now = Instant::now();
            let due = last_print.map_or(true, |t| now.duration_since(t) >= PROGRESS_INTERVAL);
            if due || p.done >= p.total {
                println!("{}", format_progress(&p));
                last_print = Some(now);
            }
        }
    })
}

pub(crate) fn format_progress(p: &BatchProgress) -> String {
    let mut line = format!(
        "  [{}/{}] {:.1}%",
        p.done,
        p.total,
        p.fraction() * 100.0
    );
    if p.failed > 0 {
        line.push_str(&format!("  ({} failed)", p.failed));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_counts_and_failures() {
        let p = BatchProgress {
            done: 3,
            total: 4,
            failed: 0,
        };
        assert_eq!(format_progress(&p), "  [3/4] 75.0%");
        let p = BatchProgress {
            done: 4,
            total: 4,
            failed: 1,
        };
        assert_eq!(format_progress(&p), "  [4/4] 100.0%  (1 failed)");
    }
}
