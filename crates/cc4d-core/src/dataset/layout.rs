//! Destination directory layout under `<output_dir>/captain_cook_4d`.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::Selection;

/// Name of the dataset directory inside the user's output directory.
pub const DATASET_DIR: &str = "captain_cook_4d";

/// Root all modality paths are relative to.
pub fn data_root(output_dir: &Path) -> PathBuf {
    output_dir.join(DATASET_DIR)
}

/// Relative directories a selection writes into.
pub fn required_dirs(selection: &Selection) -> BTreeSet<PathBuf> {
    selection
        .modalities()
        .into_iter()
        .map(|m| m.relative_dir())
        .collect()
}

/// Creates `root` and every directory in `dirs` under it. Existing
/// directories are fine. Returns the absolute paths, root first.
pub fn materialize(root: &Path, dirs: &BTreeSet<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(dirs.len() + 1);
    fs::create_dir_all(root)
        .with_context(|| format!("failed to create {}", root.display()))?;
    created.push(root.to_path_buf());
    for dir in dirs {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        created.push(path);
    }
    tracing::debug!("prepared {} directories under {}", created.len(), root.display());
    Ok(created)
}
