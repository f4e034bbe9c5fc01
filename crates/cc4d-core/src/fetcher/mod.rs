//! Batch fetcher: bounded-concurrency downloads with resume check and retry.
//!
//! Takes an ordered batch of (URL, destination) requests and materializes them
//! on disk with a fixed pool of worker threads. Per request: a destination that
//! already has the size declared by the response is skipped, a stale one is
//! replaced, transient transport failures are retried with a fixed delay, and
//! the body is streamed to disk in small chunks. Failures are isolated to
//! their request; the returned outcomes line up index-for-index with the input.

mod pool;
mod request;
mod transfer;
mod validate;

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

pub use request::{BatchProgress, BatchSummary, TransferOutcome, TransferRequest, TransferStatus};

/// Default number of transfers in flight. The dataset host resets connections
/// under more parallel streams than this.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Default write chunk size in bytes (also curl's receive buffer size).
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Per-connection curl settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Bytes per second below which a transfer counts as stalled.
    pub low_speed_limit: u32,
    /// How long a transfer may stay stalled before it is aborted.
    pub low_speed_time: Duration,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
        }
    }
}

/// Settings for a `BatchFetcher`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchConfig {
    /// Worker pool size; the hard cap on requests in flight.
    pub concurrency: usize,
    /// Write chunk size in bytes.
    pub chunk_size: usize,
    pub retry: RetryPolicy,
    pub curl: CurlOptions,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            retry: RetryPolicy::default(),
            curl: CurlOptions::default(),
        }
    }
}

/// Errors that reject a whole batch before any transfer starts.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("concurrency limit must be at least 1 (got {0})")]
    InvalidConcurrency(usize),
    #[error("retry policy must allow at least one attempt")]
    InvalidMaxAttempts,
    #[error("chunk size must be at least 1 byte")]
    InvalidChunkSize,
    #[error("request {index}: invalid source locator {locator:?}: {source}")]
    InvalidLocator {
        index: usize,
        locator: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request {index}: unsupported scheme {scheme:?} (expected http or https)")]
    UnsupportedScheme { index: usize, scheme: String },
    #[error("request {index}: empty destination path")]
    EmptyDestination { index: usize },
    #[error("requests {first} and {second} share destination {}", .path.display())]
    DuplicateDestination {
        first: usize,
        second: usize,
        path: PathBuf,
    },
}

/// Validated fetcher settings. Cheap to copy into a blocking task.
#[derive(Debug, Clone, Copy)]
pub struct BatchFetcher {
    cfg: FetchConfig,
}

impl BatchFetcher {
    /// Validates `cfg`; a zero concurrency limit, zero attempts or zero chunk size is rejected.
    pub fn new(cfg: FetchConfig) -> Result<Self, FetchError> {
        if cfg.concurrency == 0 {
            return Err(FetchError::InvalidConcurrency(cfg.concurrency));
        }
        if cfg.retry.max_attempts == 0 {
            return Err(FetchError::InvalidMaxAttempts);
        }
        if cfg.chunk_size == 0 {
            return Err(FetchError::InvalidChunkSize);
        }
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.cfg
    }

    /// Fetches every request and returns one outcome per request, in input order.
    pub fn fetch(&self, requests: &[TransferRequest]) -> Result<Vec<TransferOutcome>, FetchError> {
        self.fetch_with_progress(requests, None)
    }

    /// Like `fetch`, additionally sending a `BatchProgress` after each resolved
    /// request. Sends never block; snapshots are dropped when the channel is full.
    pub fn fetch_with_progress(
        &self,
        requests: &[TransferRequest],
        progress_tx: Option<&tokio::sync::mpsc::Sender<BatchProgress>>,
    ) -> Result<Vec<TransferOutcome>, FetchError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        validate::validate_batch(requests)?;
        tracing::info!(
            "fetching {} file(s) with {} worker(s)",
            requests.len(),
            self.cfg.concurrency.min(requests.len())
        );
        let outcomes = pool::run_pool(requests, &self.cfg, progress_tx);
        tracing::info!("batch finished: {}", BatchSummary::from_outcomes(&outcomes));
        Ok(outcomes)
    }
}

/// Fetches `requests` with default settings and the given concurrency limit.
pub fn fetch(
    requests: &[TransferRequest],
    concurrency_limit: usize,
) -> Result<Vec<TransferOutcome>, FetchError> {
    BatchFetcher::new(FetchConfig {
        concurrency: concurrency_limit,
        ..FetchConfig::default()
    })?
    .fetch(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_conservative() {
        let cfg = FetchConfig::default();
        assert_eq!(cfg.concurrency, 3);
        assert_eq!(cfg.chunk_size, 1024);
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.delay, Duration::from_secs(5));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let err = BatchFetcher::new(FetchConfig {
            concurrency: 0,
            ..FetchConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, FetchError::InvalidConcurrency(0)));
        assert!(fetch(&[], 0).is_err());
    }

    #[test]
    fn zero_attempts_rejected() {
        let mut cfg = FetchConfig::default();
        cfg.retry.max_attempts = 0;
        assert!(matches!(
            BatchFetcher::new(cfg),
            Err(FetchError::InvalidMaxAttempts)
        ));
    }

    #[test]
    fn empty_batch_returns_empty() {
        let outcomes = fetch(&[], 3).unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn malformed_batch_rejected_before_any_transfer() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.mp4");
        let batch = vec![
            TransferRequest::new("https://example.invalid/a", &dest),
            TransferRequest::new("::::", dir.path().join("b.mp4")),
        ];
        assert!(matches!(
            fetch(&batch, 2),
            Err(FetchError::InvalidLocator { index: 1, .. })
        ));
        assert!(!dest.exists());
    }
}
