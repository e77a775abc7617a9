//! Committed-bundle inspection.
//!
//! Locates the payload behind the bootstrap stub, enumerates the tar
//! entries, and reports them together with the payload digest. Used by
//! the build step for operator verification and by the `list`
//! subcommand.

use crate::digest::{Sha256Digest, compute_sha256};
use crate::error::{BundleError, Result};
use crate::stub::{PAYLOAD_MARKER, STUB_ENTRY_NAME};
use camino::Utf8Path;
use flate2::read::GzDecoder;
use serde::Serialize;
use std::fs;
use std::io::{BufRead, BufReader, Read};

/// Contents of a committed bundle.
#[derive(Debug, Clone, Serialize)]
pub struct BundleManifest {
    /// Synthetic path of the bootstrap stub, always listed first.
    pub stub: String,
    /// Payload entry paths in archive order.
    pub entries: Vec<String>,
    /// SHA-256 digest of the raw payload bytes.
    pub payload_sha256: Sha256Digest,
}

impl BundleManifest {
    /// All manifest lines in print order: the stub, then every entry.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        std::iter::once(self.stub.as_str())
            .chain(self.entries.iter().map(String::as_str))
            .collect()
    }
}

/// Read the manifest of the bundle at `path`.
///
/// # Errors
///
/// Returns [`BundleError::NotABundle`] when no payload marker is found,
/// and [`BundleError::Io`] when the file cannot be read or the payload
/// is not a gzip-compressed tar stream.
pub fn read_manifest(path: &Utf8Path) -> Result<BundleManifest> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);

    skip_stub(&mut reader, path)?;

    let mut payload = Vec::new();
    reader.read_to_end(&mut payload)?;

    let payload_sha256 = compute_sha256(&mut payload.as_slice())?;
    let entries = payload_entries(&payload)?;

    Ok(BundleManifest {
        stub: STUB_ENTRY_NAME.to_owned(),
        entries,
        payload_sha256,
    })
}

/// Consume stub lines up to and including the marker line.
fn skip_stub(reader: &mut impl BufRead, path: &Utf8Path) -> Result<()> {
    let marker_line: Vec<u8> = format!("{PAYLOAD_MARKER}\n").into_bytes();
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            return Err(BundleError::NotABundle {
                path: path.to_owned(),
            });
        }
        if line == marker_line {
            return Ok(());
        }
    }
}

/// Enumerate the entry paths of a gzip-compressed tar payload.
fn payload_entries(payload: &[u8]) -> Result<Vec<String>> {
    let decoder = GzDecoder::new(payload);
    let mut archive = tar::Archive::new(decoder);

    let mut entries = Vec::new();
    for entry in archive.entries()? {
        let entry = entry?;
        let entry_path = entry.path()?;
        entries.push(entry_path.to_string_lossy().into_owned());
    }
    Ok(entries)
}
