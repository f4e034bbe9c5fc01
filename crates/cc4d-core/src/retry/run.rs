//! Retry loop: run a closure until success or the policy says stop.

use std::time::Duration;

use super::classify;
use super::error::TransferError;
use super::policy::{RetryDecision, RetryPolicy};

/// Final result of a retried operation together with the number of attempts made.
#[derive(Debug)]
pub struct Attempted<T> {
    pub result: Result<T, TransferError>,
    pub attempts: u32,
}

/// Runs `f` until it succeeds or the retry policy says to stop, sleeping the
/// policy delay on the current thread between attempts.
/// `label` identifies the transfer in the per-attempt log lines.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, label: &str, f: F) -> Attempted<T>
where
    F: FnMut() -> Result<T, TransferError>,
{
    run_with_retry_using(policy, label, std::thread::sleep, f)
}

/// Like `run_with_retry` but with a caller-supplied sleep (tests count the waits).
pub fn run_with_retry_using<T, S, F>(
    policy: &RetryPolicy,
    label: &str,
    mut sleep: S,
    mut f: F,
) -> Attempted<T>
where
    S: FnMut(Duration),
    F: FnMut() -> Result<T, TransferError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => {
                return Attempted {
                    result: Ok(v),
                    attempts: attempt,
                }
            }
            Err(e) => {
                tracing::warn!(
                    target: "cc4d::retry",
                    "{}: attempt {}/{} failed: {}",
                    label,
                    attempt,
                    policy.max_attempts,
                    e
                );
                match policy.decide(attempt, classify::classify(&e)) {
                    RetryDecision::NoRetry => {
                        return Attempted {
                            result: Err(e),
                            attempts: attempt,
                        }
                    }
                    RetryDecision::RetryAfter(d) => {
                        tracing::info!(
                            target: "cc4d::retry",
                            "{}: retrying in {:.1}s",
                            label,
                            d.as_secs_f64()
                        );
                        sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
