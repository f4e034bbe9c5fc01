//! Transfer requests, per-request outcomes and batch summaries.

use std::fmt;
use std::path::PathBuf;

use crate::retry::TransferError;

/// One file to fetch: where it comes from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferRequest {
    /// HTTP(S) URL of the source file.
    pub source_locator: String,
    /// Local destination. Parent directories may or may not exist.
    pub destination_path: PathBuf,
}

impl TransferRequest {
    pub fn new(source_locator: impl Into<String>, destination_path: impl Into<PathBuf>) -> Self {
        Self {
            source_locator: source_locator.into(),
            destination_path: destination_path.into(),
        }
    }
}

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// Body was downloaded and written to the destination.
    Completed,
    /// Destination already had the declared size; nothing was transferred.
    Skipped,
    /// Retries exhausted, non-retryable HTTP error, or local I/O failure.
    Failed,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransferStatus::Completed => "completed",
            TransferStatus::Skipped => "skipped",
            TransferStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Result for exactly one request of a batch.
#[derive(Debug)]
pub struct TransferOutcome {
    pub request: TransferRequest,
    pub status: TransferStatus,
    /// Body bytes written by the final attempt (0 when skipped or failed early).
    pub bytes_written: u64,
    /// Number of GET attempts made.
    pub attempts: u32,
    /// Last error when `status` is `Failed`.
    pub error: Option<TransferError>,
}

impl TransferOutcome {
    pub fn completed(request: TransferRequest, bytes_written: u64, attempts: u32) -> Self {
        Self {
            request,
            status: TransferStatus::Completed,
            bytes_written,
            attempts,
            error: None,
        }
    }

    pub fn skipped(request: TransferRequest, attempts: u32) -> Self {
        Self {
            request,
            status: TransferStatus::Skipped,
            bytes_written: 0,
            attempts,
            error: None,
        }
    }

    pub fn failed(request: TransferRequest, error: TransferError, attempts: u32) -> Self {
        Self {
            request,
            status: TransferStatus::Failed,
            bytes_written: 0,
            attempts,
            error: Some(error),
        }
    }
}

/// Snapshot sent while a batch is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Requests resolved so far (any status).
    pub done: usize,
    /// Requests in the batch.
    pub total: usize,
    /// Of `done`, how many failed.
    pub failed: usize,
}

impl BatchProgress {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.done as f64 / self.total as f64).min(1.0)
    }
}

/// Counts per status over a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_written: u64,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[TransferOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut s, o| {
            match o.status {
                TransferStatus::Completed => s.completed += 1,
                TransferStatus::Skipped => s.skipped += 1,
                TransferStatus::Failed => s.failed += 1,
            }
            s.bytes_written += o.bytes_written;
            s
        })
    }

    pub fn total(&self) -> usize {
        self.completed + self.skipped + self.failed
    }

    /// True when no transfer failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} completed, {} skipped, {} failed ({} bytes written)",
            self.completed, self.skipped, self.failed, self.bytes_written
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_status() {
        let req = |n: &str| TransferRequest::new(format!("https://host/{n}"), format!("/tmp/{n}"));
        let outcomes = vec![
            TransferOutcome::completed(req("a"), 10, 1),
            TransferOutcome::completed(req("b"), 5, 3),
            TransferOutcome::skipped(req("c"), 1),
            TransferOutcome::failed(req("d"), TransferError::Http(500), 5),
        ];
        let s = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(s.completed, 2);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.failed, 1);
        assert_eq!(s.bytes_written, 15);
        assert_eq!(s.total(), 4);
        assert!(!s.is_success());
        assert_eq!(
            s.to_string(),
            "2 completed, 1 skipped, 1 failed (15 bytes written)"
        );
    }

    #[test]
    fn progress_fraction() {
        let p = BatchProgress {
            done: 1,
            total: 4,
            failed: 0,
        };
        assert!((p.fraction() - 0.25).abs() < 1e-9);
        let empty = BatchProgress {
            done: 0,
            total: 0,
            failed: 0,
        };
        assert_eq!(empty.fraction(), 1.0);
    }
}
