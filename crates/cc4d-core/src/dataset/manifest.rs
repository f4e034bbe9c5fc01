//! `download_links.json`: recording id -> { link key -> URL }.
//!
//! Values are read leniently. A key that is missing, `null`, empty or not a
//! string simply means the recording has no file for that modality (about a
//! third of the recordings were captured without a HoloLens). Recordings keep
//! the order they have in the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use super::{Modality, RecordingId};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    recordings: Map<String, Value>,
}

/// Borrowed view of one manifest entry.
#[derive(Debug, Clone, Copy)]
pub struct Recording<'a> {
    id: &'a str,
    links: &'a Value,
}

impl Manifest {
    pub fn from_json_str(data: &str) -> Result<Self> {
        serde_json::from_str(data).context("download links manifest is not a JSON object")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::from_json_str(&data).with_context(|| format!("in {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    /// Recordings in file order.
    pub fn recordings(&self) -> impl Iterator<Item = Recording<'_>> {
        self.recordings
            .iter()
            .map(|(id, links)| Recording { id, links })
    }

    pub fn get<'a>(&'a self, id: &'a str) -> Option<Recording<'a>> {
        self.recordings.get(id).map(|links| Recording { id, links })
    }
}

impl<'a> Recording<'a> {
    pub fn id(&self) -> RecordingId {
        RecordingId::new(self.id)
    }

    /// URL for `modality`, if the recording has one.
    pub fn link(&self, modality: Modality) -> Option<&'a str> {
        self.links
            .get(modality.manifest_key())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Modalities with a usable link.
    pub fn available(&self) -> Vec<Modality> {
        Modality::ALL
            .into_iter()
            .filter(|m| self.link(*m).is_some())
            .collect()
    }
}
