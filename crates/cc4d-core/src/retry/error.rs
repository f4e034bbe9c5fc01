//! Error type for a single transfer attempt.

use std::fmt;

/// Error returned by one GET attempt (curl failure, HTTP error, short body or local I/O).
/// Kept separate from `anyhow` so the retry loop can classify it.
#[derive(Debug)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection reset, DNS, etc.).
    Curl(curl::Error),
    /// Final response had a non-2xx status.
    Http(u32),
    /// Body ended before the declared `Content-Length` was reached.
    PartialTransfer { expected: u64, received: u64 },
    /// Destination could not be removed, created or written. Not retried.
    Storage(std::io::Error),
    /// The transfer panicked before reporting an outcome.
    WorkerLost,
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Curl(e) => write!(f, "{}", e),
            TransferError::Http(code) => write!(f, "HTTP {}", code),
            TransferError::PartialTransfer { expected, received } => {
                write!(f, "partial transfer: expected {} bytes, got {}", expected, received)
            }
            TransferError::Storage(e) => write!(f, "storage: {}", e),
            TransferError::WorkerLost => write!(f, "transfer panicked before reporting an outcome"),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Curl(e) => Some(e),
            TransferError::Storage(e) => Some(e),
            TransferError::Http(_)
            | TransferError::PartialTransfer { .. }
            | TransferError::WorkerLost => None,
        }
    }
}
