//! One streaming GET attempt for a single request.
//!
//! The response headers decide between skipping (destination already has the
//! declared size), replacing a stale destination, or writing a fresh file.
//! The body is written through as it arrives in `chunk_size` pieces; curl's
//! receive buffer is set to the same size so nothing larger is held in memory.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use super::request::TransferRequest;
use super::CurlOptions;
use crate::retry::TransferError;

/// What a successful attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Fetched {
    /// Destination already matched the declared size; the body was not read.
    Skipped { size: u64 },
    /// Body written to the destination.
    Written { bytes: u64 },
}

/// Per-attempt response state shared by the header and write callbacks.
#[derive(Default)]
struct ResponseState {
    status: Option<u32>,
    content_length: Option<u64>,
    skipped: bool,
    /// Size of the destination when the last 2xx header block ended.
    existing: Option<u64>,
    file: Option<File>,
    written: u64,
    storage_error: Option<io::Error>,
}

impl ResponseState {
    fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }

    /// Called on every raw header line; returns false to abort the transfer.
    fn on_header(&mut self, dest: &Path, line: &str) -> bool {
        let line = line.trim_end();
        if line.starts_with("HTTP/") {
            // New response block (redirect hops each start one).
            self.status = line.split_whitespace().nth(1).and_then(|c| c.parse().ok());
            self.content_length = None;
            self.existing = None;
            return true;
        }
        if line.is_empty() {
            return if self.is_success() {
                self.on_final_headers(dest)
            } else {
                true
            };
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse::<u64>().ok();
            }
        }
        true
    }

    /// Resume check at the end of a 2xx header block. Only a size match acts
    /// here (abort as skipped): a proxy's `200 Connection established` block
    /// also ends here, so the destination is not touched until a 2xx body
    /// starts.
    fn on_final_headers(&mut self, dest: &Path) -> bool {
        self.existing = match fs::metadata(dest) {
            Ok(meta) => Some(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                self.storage_error = Some(e);
                return false;
            }
        };
        match (self.existing, self.content_length) {
            (Some(existing), Some(total)) if existing == total => {
                tracing::info!(
                    "{} already exists with {} bytes, skipping download",
                    dest.display(),
                    existing
                );
                self.skipped = true;
                false
            }
            _ => true,
        }
    }

    /// Replaces whatever is at `dest` with an empty file for the body.
    fn open_destination(&self, dest: &Path) -> io::Result<File> {
        if let Some(existing) = self.existing {
            match self.content_length {
                Some(total) => tracing::info!(
                    "{} already exists, but size {} differs from {}, downloading again",
                    dest.display(),
                    existing,
                    total
                ),
                None => tracing::info!(
                    "{} already exists and the source declares no size, downloading again",
                    dest.display()
                ),
            }
            if let Err(e) = fs::remove_file(dest) {
                if e.kind() != io::ErrorKind::NotFound {
                    return Err(e);
                }
            }
        }
        ensure_parent(dest)?;
        File::create(dest)
    }

    /// Body callback; returns the byte count curl expects or 0 to abort.
    fn on_body(&mut self, dest: &Path, data: &[u8], chunk_size: usize) -> usize {
        if !self.is_success() {
            // Error page body of a non-2xx response; never touches the destination.
            return data.len();
        }
        if let Err(e) = self.write_chunks(dest, data, chunk_size) {
            tracing::warn!("write to {} failed: {}", dest.display(), e);
            self.storage_error = Some(e);
            return 0;
        }
        data.len()
    }

    fn write_chunks(&mut self, dest: &Path, data: &[u8], chunk_size: usize) -> io::Result<()> {
        if self.file.is_none() {
            self.file = Some(self.open_destination(dest)?);
        }
        if let Some(file) = self.file.as_mut() {
            for chunk in data.chunks(chunk_size.max(1)) {
                file.write_all(chunk)?;
                self.written += chunk.len() as u64;
            }
        }
        Ok(())
    }
}

fn ensure_parent(dest: &Path) -> io::Result<()> {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Performs one GET for `request` and streams the body to its destination.
/// Returns `TransferError` so the caller can classify and retry.
pub(super) fn fetch_once(
    request: &TransferRequest,
    chunk_size: usize,
    curl: CurlOptions,
) -> Result<Fetched, TransferError> {
    let dest = request.destination_path.as_path();
    let state = RefCell::new(ResponseState::default());

    let mut easy = curl::easy::Easy::new();
    easy.url(&request.source_locator)
        .map_err(TransferError::Curl)?;
    easy.follow_location(true).map_err(TransferError::Curl)?;
    easy.max_redirections(10).map_err(TransferError::Curl)?;
    // libcurl clamps this to at least 1024 bytes.
    easy.buffer_size(chunk_size).map_err(TransferError::Curl)?;
    easy.connect_timeout(curl.connect_timeout)
        .map_err(TransferError::Curl)?;
    // Abort if throughput stays below the limit for the window; large video
    // files on slow links must not hit a wall-clock timeout.
    easy.low_speed_limit(curl.low_speed_limit)
        .map_err(TransferError::Curl)?;
    easy.low_speed_time(curl.low_speed_time)
        .map_err(TransferError::Curl)?;

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                let line = String::from_utf8_lossy(data);
                state.borrow_mut().on_header(dest, &line)
            })
            .map_err(TransferError::Curl)?;
        transfer
            .write_function(|data| Ok(state.borrow_mut().on_body(dest, data, chunk_size)))
            .map_err(TransferError::Curl)?;
        transfer.perform()
    };

    let mut state = state.into_inner();
    if state.skipped {
        return Ok(Fetched::Skipped {
            size: state.content_length.unwrap_or_default(),
        });
    }
    if let Err(e) = perform_result {
        if let Some(io_err) = state.storage_error.take() {
            return Err(TransferError::Storage(io_err));
        }
        return Err(TransferError::Curl(e));
    }

    let code = easy.response_code().map_err(TransferError::Curl)?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }

    match state.file.take() {
        Some(mut file) => file.flush().map_err(TransferError::Storage)?,
        // Empty body: the write callback never ran.
        None => {
            state.open_destination(dest).map_err(TransferError::Storage)?;
        }
    }

    if let Some(expected) = state.content_length {
        if state.written != expected {
            return Err(TransferError::PartialTransfer {
                expected,
                received: state.written,
            });
        }
    }
    Ok(Fetched::Written {
        bytes: state.written,
    })
}
