//! Batch checks run before any worker starts.

use std::collections::HashMap;
use std::path::Path;

use super::request::TransferRequest;
use super::FetchError;

/// Rejects a batch whose requests cannot all be attempted: a locator that is
/// not an HTTP(S) URL, an empty destination, or two requests writing the same file.
pub(super) fn validate_batch(requests: &[TransferRequest]) -> Result<(), FetchError> {
    let mut seen: HashMap<&Path, usize> = HashMap::with_capacity(requests.len());
    for (index, req) in requests.iter().enumerate() {
        let url = url::Url::parse(&req.source_locator).map_err(|source| {
            FetchError::InvalidLocator {
                index,
                locator: req.source_locator.clone(),
                source,
            }
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme {
                index,
                scheme: url.scheme().to_string(),
            });
        }
        if req.destination_path.as_os_str().is_empty() {
            return Err(FetchError::EmptyDestination { index });
        }
        if let Some(first) = seen.insert(req.destination_path.as_path(), index) {
            return Err(FetchError::DuplicateDestination {
                first,
                second: index,
                path: req.destination_path.clone(),
            });
        }
    }
    Ok(())
}
