//! CaptainCook4D dataset layer: which files exist per recording, where they
//! land on disk, and which of them a user selection asks for.
//!
//! Everything here is pure data plus one directory-creation routine; the
//! result is a list of `TransferRequest`s for the batch fetcher.

pub mod layout;
pub mod manifest;
pub mod modality;
pub mod plan;

use std::fmt;

pub use manifest::{Manifest, Recording};
pub use modality::{Device, Modality};
pub use plan::{build_plan, Plan, Selection};

/// Identifier of one recorded session, e.g. `1_7`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordingId(String);

impl RecordingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordingId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
