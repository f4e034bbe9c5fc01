//! Turn a manifest and a user selection into transfer requests.

use std::path::Path;

use super::{Manifest, Modality, RecordingId};
use crate::fetcher::TransferRequest;

/// What the user asked to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// GoPro videos: 360p with `data2d`, plus 4K when `resolution_4k` is also set.
    Gopro { data2d: bool, resolution_4k: bool },
    /// HoloLens synchronized streams: PV video with `data2d`, depth/pose/IMU with `data3d`.
    Hololens { data2d: bool, data3d: bool },
}

impl Selection {
    /// Modalities this selection asks for, in per-recording download order.
    pub fn modalities(&self) -> Vec<Modality> {
        let mut out = Vec::new();
        match *self {
            Selection::Gopro {
                data2d,
                resolution_4k,
            } => {
                if data2d {
                    out.push(Modality::Gopro360p);
                    if resolution_4k {
                        out.push(Modality::Gopro4k);
                    }
                }
            }
            Selection::Hololens { data2d, data3d } => {
                if data2d {
                    out.push(Modality::HololensSyncPvVideo);
                }
                if data3d {
                    out.extend(Modality::HOLOLENS_SYNC_3D);
                }
            }
        }
        out
    }
}

/// Ordered requests for a selection, plus the files the manifest has no link for.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub requests: Vec<TransferRequest>,
    pub missing: Vec<(RecordingId, Modality)>,
}

/// Builds the transfer list for `selection`, with destinations under `data_root`.
///
/// A modality without a link falls back to its `Modality::fallback` link when
/// there is one, keeping the original destination.
pub fn build_plan(manifest: &Manifest, selection: &Selection, data_root: &Path) -> Plan {
    let modalities = selection.modalities();
    let mut plan = Plan::default();
    for recording in manifest.recordings() {
        let id = recording.id();
        for &modality in &modalities {
            let link = recording.link(modality).or_else(|| {
                let fallback = modality.fallback()?;
                let url = recording.link(fallback)?;
                tracing::info!("{}: no {} link, using {} instead", id, modality, fallback);
                Some(url)
            });
            match link {
                Some(url) => plan.requests.push(TransferRequest::new(
                    url,
                    data_root.join(modality.relative_path(&id)),
                )),
                None => {
                    tracing::debug!("{}: {} not available", id, modality);
                    plan.missing.push((id.clone(), modality));
                }
            }
        }
    }
    plan
}
