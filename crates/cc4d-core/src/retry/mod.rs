//! Retry policy for single transfers.
//!
//! Classifies curl errors, HTTP statuses and local I/O failures into error
//! kinds and decides whether another attempt is made. The delay between
//! attempts is fixed: the dataset host resets connections when hammered, so
//! there is no exponential ramp to speed things up.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::TransferError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, run_with_retry_using, Attempted};
