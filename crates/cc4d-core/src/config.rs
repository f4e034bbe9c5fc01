use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::{CurlOptions, FetchConfig, DEFAULT_CHUNK_SIZE, DEFAULT_CONCURRENCY};
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per file (including the first).
    pub max_attempts: u32,
    /// Fixed delay in seconds between attempts.
    pub delay_secs: f64,
    /// Retry 4xx responses (e.g. expired links) instead of failing on the first one.
    #[serde(default)]
    pub retry_client_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_secs: 5.0,
            retry_client_errors: false,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::try_from_secs_f64(self.delay_secs.max(0.0)).unwrap_or_default(),
            retry_client_errors: self.retry_client_errors,
        }
    }
}

/// Global configuration loaded from `~/.config/cc4d/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cc4dConfig {
    /// Number of files downloaded at once. Keep this low; the host resets
    /// connections when more parallel streams are opened.
    pub concurrency: usize,
    /// Write chunk size in bytes.
    pub chunk_size: usize,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Transfers slower than this many bytes/sec for `low_speed_time_secs` are aborted.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for Cc4dConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            retry: None,
        }
    }
}

impl Cc4dConfig {
    /// Fetcher settings derived from this config. Validation happens in `BatchFetcher::new`.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            concurrency: self.concurrency,
            chunk_size: self.chunk_size,
            retry: self.retry.clone().unwrap_or_default().policy(),
            curl: CurlOptions {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                low_speed_limit: self.low_speed_limit_bytes,
                low_speed_time: Duration::from_secs(self.low_speed_time_secs),
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cc4d")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Cc4dConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = Cc4dConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: Cc4dConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
