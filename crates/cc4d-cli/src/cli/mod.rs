//! CLI for the CaptainCook4D dataset fetcher.

mod commands;
mod progress;

use anyhow::Result;
use cc4d_core::config;
use cc4d_core::dataset::Selection;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::run_download;

/// Top-level CLI for the dataset fetcher.
#[derive(Debug, Parser)]
#[command(name = "cc4d")]
#[command(about = "Download the CaptainCook4D dataset", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by every download command.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory the `captain_cook_4d` folder is created in.
    #[arg(long, default_value = "data", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Recording id -> download links JSON file.
    #[arg(long, default_value = "metadata/download_links.json", value_name = "FILE")]
    pub manifest: PathBuf,

    /// Download up to N files at once (overrides `concurrency` in config.toml).
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Print what would be downloaded without creating or fetching anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download GoPro videos.
    Gopro {
        /// Download the 360p videos.
        #[arg(long)]
        data2d: bool,

        /// Also download the 4K videos (requires --data2d).
        #[arg(long = "resolution4K", alias = "resolution4k")]
        resolution_4k: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Download synchronized HoloLens streams.
    Hololens {
        /// Download the PV camera videos.
        #[arg(long)]
        data2d: bool,

        /// Download depth, pose, spatial and IMU streams.
        #[arg(long)]
        data3d: bool,

        #[command(flatten)]
        common: CommonArgs,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let (selection, common) = cli.command.into_selection();
        run_download(&cfg, selection, &common).await
    }

    /// Splits the command into what to download and where.
    pub fn into_selection(self) -> (Selection, CommonArgs) {
        match self {
            CliCommand::Gopro {
                data2d,
                resolution_4k,
                common,
            } => (
                Selection::Gopro {
                    data2d,
                    resolution_4k,
                },
                common,
            ),
            CliCommand::Hololens {
                data2d,
                data3d,
                common,
            } => (Selection::Hololens { data2d, data3d }, common),
        }
    }
}

#[cfg(test)]
mod tests;
