//! `cc4d gopro` / `cc4d hololens`: plan, prepare directories and fetch.

use anyhow::{Context, Result};
use cc4d_core::config::Cc4dConfig;
use cc4d_core::dataset::{build_plan, layout, Manifest, Plan, Selection};
use cc4d_core::fetcher::{BatchFetcher, BatchProgress, BatchSummary, TransferStatus};

use crate::cli::progress;
use crate::cli::CommonArgs;

pub async fn run_download(cfg: &Cc4dConfig, selection: Selection, args: &CommonArgs) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    tracing::info!(
        "loaded {} recording(s) from {}",
        manifest.len(),
        args.manifest.display()
    );
    let root = layout::data_root(&args.output_dir);
    let plan = build_plan(&manifest, &selection, &root);
    report_missing(&plan);

    if plan.requests.is_empty() {
        println!("Nothing to download for this selection.");
        return Ok(());
    }

    if args.dry_run {
        for request in &plan.requests {
            println!(
                "{}  <-  {}",
                request.destination_path.display(),
                request.source_locator
            );
        }
        println!(
            "{} file(s) would be downloaded to {}.",
            plan.requests.len(),
            root.display()
        );
        return Ok(());
    }

    let mut fetch_cfg = cfg.fetch_config();
    if let Some(jobs) = args.jobs {
        fetch_cfg.concurrency = jobs;
    }
    let fetcher = BatchFetcher::new(fetch_cfg).context("invalid download settings")?;
    layout::materialize(&root, &layout::required_dirs(&selection))?;

    let (progress_tx, progress_rx) = tokio::sync::mpsc::channel::<BatchProgress>(64);
    let printer = progress::spawn_printer(progress_rx);
    let requests = plan.requests;
    // The fetcher blocks on its worker threads; the sender drops with the closure.
    let outcomes = tokio::task::spawn_blocking(move || {
        fetcher.fetch_with_progress(&requests, Some(&progress_tx))
    })
    .await
    .context("download task panicked")??;
    let _ = printer.await;

    for outcome in outcomes
        .iter()
        .filter(|o| o.status == TransferStatus::Failed)
    {
        let reason = outcome
            .error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        eprintln!(
            "failed: {} after {} attempt(s): {}",
            outcome.request.destination_path.display(),
            outcome.attempts,
            reason
        );
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    println!("{}", summary);
    if !summary.is_success() {
        anyhow::bail!(
            "{} of {} file(s) failed to download",
            summary.failed,
            summary.total()
        );
    }
    Ok(())
}

fn report_missing(plan: &Plan) {
    if plan.missing.is_empty() {
        return;
    }
    tracing::info!(
        "{} file(s) have no download link in the manifest",
        plan.missing.len()
    );
    for (id, modality) in &plan.missing {
        tracing::debug!("no link: {} {}", id, modality);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn args(dir: &Path, dry_run: bool) -> CommonArgs {
        let manifest = dir.join("download_links.json");
        fs::write(
            &manifest,
            r#"{"1_7": {"gopro_360p": "http://127.0.0.1:9/1_7_360p"}}"#,
        )
        .unwrap();
        CommonArgs {
            output_dir: dir.join("data"),
            manifest,
            jobs: None,
            dry_run,
        }
    }

    #[tokio::test]
    async fn dry_run_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), true);
        let selection = Selection::Gopro {
            data2d: true,
            resolution_4k: true,
        };
        run_download(&Cc4dConfig::default(), selection, &args)
            .await
            .unwrap();
        assert!(!dir.path().join("data").exists());
    }

    #[tokio::test]
    async fn empty_selection_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), false);
        let selection = Selection::Hololens {
            data2d: false,
            data3d: false,
        };
        run_download(&Cc4dConfig::default(), selection, &args)
            .await
            .unwrap();
        assert!(!dir.path().join("data").exists());
    }

    #[tokio::test]
    async fn zero_jobs_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), false);
        args.jobs = Some(0);
        let selection = Selection::Gopro {
            data2d: true,
            resolution_4k: false,
        };
        let err = run_download(&Cc4dConfig::default(), selection, &args)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("invalid download settings"));
        assert!(!dir.path().join("data").exists());
    }

    #[tokio::test]
    async fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = CommonArgs {
            output_dir: dir.path().join("data"),
            manifest: dir.path().join("nope.json"),
            jobs: None,
            dry_run: false,
        };
        let selection = Selection::Gopro {
            data2d: true,
            resolution_4k: false,
        };
        assert!(run_download(&Cc4dConfig::default(), selection, &args)
            .await
            .is_err());
    }
}
