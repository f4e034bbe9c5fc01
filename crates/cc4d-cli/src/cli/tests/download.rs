//! Tests for the gopro and hololens subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use cc4d_core::dataset::Selection;
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_gopro_defaults() {
    match parse(&["cc4d", "gopro"]) {
        CliCommand::Gopro {
            data2d,
            resolution_4k,
            common,
        } => {
            assert!(!data2d);
            assert!(!resolution_4k);
            assert_eq!(common.output_dir, Path::new("data"));
            assert_eq!(common.manifest, Path::new("metadata/download_links.json"));
            assert!(common.jobs.is_none());
            assert!(!common.dry_run);
        }
        _ => panic!("expected Gopro"),
    }
}

#[test]
fn cli_parse_gopro_4k() {
    let (selection, _) = parse(&["cc4d", "gopro", "--data2d", "--resolution4K"]).into_selection();
    assert_eq!(
        selection,
        Selection::Gopro {
            data2d: true,
            resolution_4k: true
        }
    );
    let (lower, _) = parse(&["cc4d", "gopro", "--data2d", "--resolution4k"]).into_selection();
    assert_eq!(lower, selection);
}

#[test]
fn cli_parse_hololens_with_common_args() {
    match parse(&[
        "cc4d",
        "hololens",
        "--data3d",
        "--output-dir",
        "/mnt/datasets",
        "--manifest",
        "links.json",
        "--jobs",
        "8",
        "--dry-run",
    ]) {
        CliCommand::Hololens {
            data2d,
            data3d,
            common,
        } => {
            assert!(!data2d);
            assert!(data3d);
            assert_eq!(common.output_dir, Path::new("/mnt/datasets"));
            assert_eq!(common.manifest, Path::new("links.json"));
            assert_eq!(common.jobs, Some(8));
            assert!(common.dry_run);
        }
        _ => panic!("expected Hololens"),
    }
}

#[test]
fn cli_parse_hololens_selection() {
    let (selection, common) = parse(&["cc4d", "hololens", "--data2d"]).into_selection();
    assert_eq!(
        selection,
        Selection::Hololens {
            data2d: true,
            data3d: false
        }
    );
    assert_eq!(common.output_dir, Path::new("data"));
}

#[test]
fn cli_rejects_unknown_flags_and_missing_command() {
    assert!(Cli::try_parse_from(["cc4d"]).is_err());
    assert!(Cli::try_parse_from(["cc4d", "gopro", "--data3d"]).is_err());
    assert!(Cli::try_parse_from(["cc4d", "hololens", "--jobs", "many"]).is_err());
}
