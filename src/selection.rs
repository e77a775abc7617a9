//! Deterministic source selection for bundle builds.
//!
//! Scans the configured source tree recursively, keeps files whose
//! suffix matches the filter, force-includes the entry point, and orders
//! the result by archive path so identical trees always select identical
//! entry sets.

use crate::config::BuildConfig;
use crate::error::{BundleError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace, warn};

/// One file chosen for the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Location of the file on disk.
    pub source_path: Utf8PathBuf,
    /// Path the file takes inside the payload, relative to the tree root.
    pub archive_path: String,
}

/// Outcome of a selection pass.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Files to stage, sorted by archive path, entry point included.
    pub files: Vec<SelectedFile>,
    /// True when the configured entry point was not found on disk.
    pub entry_point_missing: bool,
}

/// Select the files a build of `config` would stage.
///
/// The configured output path is never selected, even when a custom
/// suffix filter would match a stale bundle sitting inside the tree.
///
/// # Errors
///
/// Returns [`BundleError::SourceDirNotFound`] when the source directory
/// does not exist, and [`BundleError::Io`] when the tree cannot be read.
pub fn select_sources(config: &BuildConfig) -> Result<Selection> {
    if !config.source_dir.is_dir() {
        return Err(BundleError::SourceDirNotFound {
            path: config.source_dir.clone(),
        });
    }

    let mut files = Vec::new();
    walk(&config.source_dir, &config.source_dir, config, &mut files)?;

    let entry_point_missing = force_include_entry(config, &mut files);

    files.sort_by(|a, b| a.archive_path.cmp(&b.archive_path));
    files.dedup_by(|a, b| a.archive_path == b.archive_path);

    debug!(
        "selected {} file(s) under {}",
        files.len(),
        config.source_dir
    );
    Ok(Selection {
        files,
        entry_point_missing,
    })
}

/// Recurse through `dir`, collecting suffix matches relative to `root`.
fn walk(
    root: &Utf8Path,
    dir: &Utf8Path,
    config: &BuildConfig,
    out: &mut Vec<SelectedFile>,
) -> Result<()> {
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            walk(root, path, config, out)?;
            continue;
        }
        if is_output_artifact(path, &config.output_path) {
            trace!("skipping output artifact {path}");
            continue;
        }
        if !matches_suffix(path, &config.suffixes) {
            continue;
        }

        let archive_path = relative_archive_path(root, path)?;
        trace!("selected {archive_path}");
        out.push(SelectedFile {
            source_path: path.to_owned(),
            archive_path,
        });
    }
    Ok(())
}

/// Add the entry point when it exists and the filter did not already
/// select it. Returns true when the file is missing from disk.
fn force_include_entry(config: &BuildConfig, files: &mut Vec<SelectedFile>) -> bool {
    if files.iter().any(|f| f.archive_path == config.entry_point) {
        return false;
    }

    let entry_src = config.source_dir.join(&config.entry_point);
    if entry_src.is_file() {
        trace!("force-including entry point {}", config.entry_point);
        files.push(SelectedFile {
            source_path: entry_src,
            archive_path: config.entry_point.clone(),
        });
        return false;
    }
    warn!(
        "entry point {} not found under {}; bundle will be built without it",
        config.entry_point, config.source_dir
    );
    true
}

/// True when the filename's extension is in the suffix set.
fn matches_suffix(path: &Utf8Path, suffixes: &[String]) -> bool {
    path.extension()
        .is_some_and(|ext| suffixes.iter().any(|s| s == ext))
}

/// True when `path` names the configured output artifact.
///
/// Falls back to literal comparison when either path cannot be
/// canonicalized, which covers the usual case of an output that does not
/// exist yet.
fn is_output_artifact(path: &Utf8Path, output: &Utf8Path) -> bool {
    if path == output {
        return true;
    }
    match (
        std::fs::canonicalize(path),
        std::fs::canonicalize(output),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Compute the archive path of `path` relative to `root`.
fn relative_archive_path(root: &Utf8Path, path: &Utf8Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| BundleError::InvalidEntryPoint {
            path: path.as_str().to_owned(),
            reason: format!("file escapes the source tree rooted at {root}"),
        })?;
    Ok(relative.as_str().to_owned())
}
