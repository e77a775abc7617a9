//! Bundle construction with buffer-then-commit semantics.
//!
//! Orchestrates one build: validate the readonly guard, drop any stale
//! artifact, stage the stub and the gzip-compressed tar payload into a
//! temporary file, persist it to the final path, mark it executable, and
//! read it back for the operator manifest. A failure at any point leaves
//! no partial artifact at the output path.

use crate::config::{BuildConfig, READONLY_FLAG};
use crate::error::{BundleError, Result};
use crate::manifest::{self, BundleManifest};
use crate::selection::{self, Selection};
use crate::stub::render_stub;
use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::write::GzEncoder;
use log::debug;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// Result of a successful bundle build.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Path of the committed bundle.
    pub output_path: Utf8PathBuf,
    /// Manifest read back from the committed bundle.
    pub manifest: BundleManifest,
    /// True when the configured entry point was not found on disk and
    /// the bundle was built without it.
    pub entry_point_missing: bool,
}

/// Build the bundle described by `config`.
///
/// The readonly guard is checked before any other action; a guarded host
/// is left completely untouched, stale artifact included.
///
/// # Errors
///
/// Returns [`BundleError::WritesForbidden`] when the guard is set,
/// [`BundleError::EmptySelection`] when nothing matches the filter and
/// no entry point exists, and the underlying I/O or commit error when
/// staging fails.
pub fn build_bundle(config: &BuildConfig) -> Result<BuildOutcome> {
    if config.readonly_guard {
        return Err(BundleError::WritesForbidden {
            flag: READONLY_FLAG,
        });
    }

    remove_stale_artifact(&config.output_path)?;

    let selection = selection::select_sources(config)?;
    if selection.files.is_empty() {
        return Err(BundleError::EmptySelection {
            source_dir: config.source_dir.clone(),
        });
    }

    let staged = stage_bundle(config, &selection)?;
    commit(staged, &config.output_path)?;
    set_executable(&config.output_path)?;

    let manifest = manifest::read_manifest(&config.output_path)?;
    debug!(
        "committed {} with {} payload entries",
        config.output_path,
        manifest.entries.len()
    );

    Ok(BuildOutcome {
        output_path: config.output_path.clone(),
        manifest,
        entry_point_missing: selection.entry_point_missing,
    })
}

/// Delete a pre-existing artifact at the output path, if any.
fn remove_stale_artifact(output: &Utf8Path) -> Result<()> {
    match fs::remove_file(output) {
        Ok(()) => {
            debug!("removed stale artifact {output}");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Write stub and payload into a temporary file next to the output path.
///
/// Staging in the destination directory keeps the later persist a rename
/// on the same filesystem.
fn stage_bundle(config: &BuildConfig, selection: &Selection) -> Result<NamedTempFile> {
    let staging_dir = staging_dir_for(&config.output_path);
    let mut staged = NamedTempFile::new_in(staging_dir)?;

    let stub = render_stub(&config.bundle_name, &config.entry_point);
    staged.write_all(stub.as_bytes())?;
    write_payload(staged.as_file_mut(), selection)?;
    staged.flush()?;

    Ok(staged)
}

/// Directory the staging file lives in: the output's parent, or the
/// current directory for a bare filename.
fn staging_dir_for(output: &Utf8Path) -> &Utf8Path {
    match output.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

/// Append every selected file to a gzip-compressed tar stream.
fn write_payload(file: &mut fs::File, selection: &Selection) -> Result<()> {
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for selected in &selection.files {
        builder.append_path_with_name(&selected.source_path, &selected.archive_path)?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;
    Ok(())
}

/// Atomically move the staged file to its final path.
fn commit(staged: NamedTempFile, output: &Utf8Path) -> Result<()> {
    staged
        .persist(output)
        .map_err(|e| BundleError::CommitFailed {
            path: output.to_owned(),
            reason: e.error.to_string(),
        })?;
    Ok(())
}

/// Mark the committed bundle executable (rwxr-xr-x).
#[cfg(unix)]
fn set_executable(output: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(output)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(output, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_output: &Utf8Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "bundle_tests.rs"]
mod tests;
