//! Operator-facing message formatting.
//!
//! Library code never prints directly; every message is rendered through
//! an injected [`Write`] handle so the binary decides where text goes and
//! tests can capture it.

use crate::bundle::BuildOutcome;
use crate::config::BuildConfig;
use crate::error::{BundleError, Result};
use crate::manifest::BundleManifest;
use crate::selection::Selection;
use std::io::Write;

/// Success line reported after a committed build.
#[must_use]
pub fn success_message(outcome: &BuildOutcome) -> String {
    format!("Bundle created: {}", outcome.output_path)
}

/// Warning reported when the entry point was absent from disk.
#[must_use]
pub fn entry_warning(entry_point: &str) -> String {
    format!("warning: entry point {entry_point} not found; bundle built without it")
}

/// Render the post-build operator report: success line, payload digest,
/// and one manifest line per archived entry.
///
/// # Errors
///
/// Returns [`BundleError::WriteFailed`] when the handle rejects a write.
pub fn render_report(outcome: &BuildOutcome, out: &mut dyn Write) -> Result<()> {
    write_line(out, success_message(outcome))?;
    write_line(
        out,
        format!("Payload SHA-256: {}", outcome.manifest.payload_sha256),
    )?;
    write_line(out, "Contents:")?;
    render_manifest_lines(&outcome.manifest, out)
}

/// Render a manifest as plain text, one entry path per line.
///
/// # Errors
///
/// Returns [`BundleError::WriteFailed`] when the handle rejects a write.
pub fn render_manifest_text(manifest: &BundleManifest, out: &mut dyn Write) -> Result<()> {
    render_manifest_lines(manifest, out)
}

/// Render a manifest as pretty-printed JSON for scripting.
///
/// # Errors
///
/// Returns [`BundleError::Serialization`] when encoding fails and
/// [`BundleError::WriteFailed`] when the handle rejects a write.
pub fn render_manifest_json(manifest: &BundleManifest, out: &mut dyn Write) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    write_line(out, json)
}

/// Render the dry-run preview: configuration, then the would-be entries.
///
/// # Errors
///
/// Returns [`BundleError::WriteFailed`] when the handle rejects a write.
pub fn render_dry_run(
    config: &BuildConfig,
    selection: &Selection,
    out: &mut dyn Write,
) -> Result<()> {
    write_line(out, "Dry run - no files will be modified")?;
    write_line(out, "")?;
    write_line(out, format!("Source directory: {}", config.source_dir))?;
    write_line(out, format!("Output path: {}", config.output_path))?;
    write_line(out, format!("Bundle name: {}", config.bundle_name))?;
    write_line(out, format!("Entry point: {}", config.entry_point))?;
    write_line(
        out,
        format!("Suffix filter: {}", config.suffixes.join(", ")),
    )?;
    if selection.entry_point_missing {
        write_line(out, entry_warning(&config.entry_point))?;
    }
    write_line(out, "")?;
    write_line(out, "Files to bundle:")?;
    for file in &selection.files {
        write_line(out, format!("  - {}", file.archive_path))?;
    }
    Ok(())
}

fn render_manifest_lines(manifest: &BundleManifest, out: &mut dyn Write) -> Result<()> {
    for line in manifest.lines() {
        write_line(out, line)?;
    }
    Ok(())
}

fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) -> Result<()> {
    writeln!(out, "{message}").map_err(|source| BundleError::WriteFailed { source })
}
