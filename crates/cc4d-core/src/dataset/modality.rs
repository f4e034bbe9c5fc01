//! Modalities of a recording and the path rule for each.

use std::fmt;
use std::path::PathBuf;

use super::RecordingId;

/// Capture device a modality comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Gopro,
    Hololens,
}

/// One downloadable data stream of a recording, keyed in the manifest by
/// `manifest_key()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modality {
    Gopro360p,
    Gopro4k,
    HololensSyncPvVideo,
    HololensSyncPvFramesZip,
    HololensSyncDepthAhatAbZip,
    HololensSyncDepthAhatDepthZip,
    HololensSyncPvPosePkl,
    HololensSyncDepthPosePkl,
    HololensSyncSpatialPkl,
    HololensSyncImuMagnetometerPkl,
    HololensSyncImuGyroscopePkl,
    HololensSyncImuAccelerometerPkl,
}

/// Where a modality's files go, relative to the data root, and how each file is named.
struct PathRule {
    dirs: &'static [&'static str],
    /// Appended to the recording id to form the file name.
    suffix: &'static str,
}

impl Modality {
    pub const ALL: [Modality; 12] = [
        Modality::Gopro360p,
        Modality::Gopro4k,
        Modality::HololensSyncPvVideo,
        Modality::HololensSyncPvFramesZip,
        Modality::HololensSyncDepthAhatAbZip,
        Modality::HololensSyncDepthAhatDepthZip,
        Modality::HololensSyncPvPosePkl,
        Modality::HololensSyncDepthPosePkl,
        Modality::HololensSyncSpatialPkl,
        Modality::HololensSyncImuMagnetometerPkl,
        Modality::HololensSyncImuGyroscopePkl,
        Modality::HololensSyncImuAccelerometerPkl,
    ];

    /// Synchronized HoloLens 3D streams (depth, pose, spatial, IMU).
    pub const HOLOLENS_SYNC_3D: [Modality; 9] = [
        Modality::HololensSyncPvFramesZip,
        Modality::HololensSyncDepthAhatAbZip,
        Modality::HololensSyncDepthAhatDepthZip,
        Modality::HololensSyncPvPosePkl,
        Modality::HololensSyncDepthPosePkl,
        Modality::HololensSyncSpatialPkl,
        Modality::HololensSyncImuMagnetometerPkl,
        Modality::HololensSyncImuGyroscopePkl,
        Modality::HololensSyncImuAccelerometerPkl,
    ];

    /// Key of this modality's link in `download_links.json`.
    pub fn manifest_key(self) -> &'static str {
        match self {
            Modality::Gopro360p => "gopro_360p",
            Modality::Gopro4k => "gopro_4k",
            Modality::HololensSyncPvVideo => "hololens_sync_pv_video",
            Modality::HololensSyncPvFramesZip => "hololens_sync_pv_frames_zip",
            Modality::HololensSyncDepthAhatAbZip => "hololens_sync_depth_ahat_ab_zip",
            Modality::HololensSyncDepthAhatDepthZip => "hololens_sync_depth_ahat_depth_zip",
            Modality::HololensSyncPvPosePkl => "hololens_sync_pv_pose_pkl",
            Modality::HololensSyncDepthPosePkl => "hololens_sync_depth_pose_pkl",
            Modality::HololensSyncSpatialPkl => "hololens_sync_spatial_pkl",
            Modality::HololensSyncImuMagnetometerPkl => "hololens_sync_imu_magnetometer_pkl",
            Modality::HololensSyncImuGyroscopePkl => "hololens_sync_imu_gyroscope_pkl",
            Modality::HololensSyncImuAccelerometerPkl => "hololens_sync_imu_accelerometer_pkl",
        }
    }

    pub fn from_manifest_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.manifest_key() == key)
    }

    pub fn device(self) -> Device {
        match self {
            Modality::Gopro360p | Modality::Gopro4k => Device::Gopro,
            _ => Device::Hololens,
        }
    }

    /// Modality whose link stands in when this one has none. Recordings
    /// captured without a GoPro stream still get a 360p video from the
    /// HoloLens PV camera.
    pub fn fallback(self) -> Option<Modality> {
        match self {
            Modality::Gopro360p => Some(Modality::HololensSyncPvVideo),
            _ => None,
        }
    }

    fn rule(self) -> PathRule {
        const fn r(dirs: &'static [&'static str], suffix: &'static str) -> PathRule {
            PathRule { dirs, suffix }
        }
        match self {
            Modality::Gopro360p => r(&["gopro", "resolution_360p"], "_360p.mp4"),
            Modality::Gopro4k => r(&["gopro", "resolution_4k"], "_4K.mp4"),
            Modality::HololensSyncPvVideo => r(&["hololens", "sync", "pv"], "_360p.mp4"),
            Modality::HololensSyncPvFramesZip => r(&["hololens", "sync", "pv"], "_frames.zip"),
            Modality::HololensSyncDepthAhatAbZip => r(&["hololens", "sync", "ab"], "_ab.zip"),
            Modality::HololensSyncDepthAhatDepthZip => {
                r(&["hololens", "sync", "depth"], "_depth.zip")
            }
            Modality::HololensSyncPvPosePkl => r(&["hololens", "sync", "pv_pose"], "_pv_pose.pkl"),
            Modality::HololensSyncDepthPosePkl => {
                r(&["hololens", "sync", "depth_pose"], "_depth_pose.pkl")
            }
            Modality::HololensSyncSpatialPkl => {
                r(&["hololens", "sync", "spatial_pose"], "_spatial.pkl")
            }
            Modality::HololensSyncImuMagnetometerPkl => r(
                &["hololens", "sync", "imu_magnetometer"],
                "_imu_magnetometer.pkl",
            ),
            Modality::HololensSyncImuGyroscopePkl => {
                r(&["hololens", "sync", "imu_gyroscope"], "_imu_gyroscope.pkl")
            }
            Modality::HololensSyncImuAccelerometerPkl => r(
                &["hololens", "sync", "imu_accelerometer"],
                "_imu_accelerometer.pkl",
            ),
        }
    }

    /// Directory holding this modality's files, relative to the data root.
    pub fn relative_dir(self) -> PathBuf {
        self.rule().dirs.iter().collect()
    }

    /// File for `recording`, relative to the data root.
    pub fn relative_path(self, recording: &RecordingId) -> PathBuf {
        let rule = self.rule();
        self.relative_dir()
            .join(format!("{}{}", recording.as_str(), rule.suffix))
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_key())
    }
}
