//! Error types for the selfpack CLI.
//!
//! This module defines semantic error variants that provide actionable
//! guidance when bundle construction fails. Each error includes recovery
//! hints where applicable.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while building or inspecting a bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The host environment forbids bundle writes.
    #[error("bundle writes are disabled by {flag}; unset it to allow packaging")]
    WritesForbidden {
        /// Name of the environment flag that blocked the build.
        flag: &'static str,
    },

    /// The configured source directory does not exist or is not a directory.
    #[error("source directory not found: {path}")]
    SourceDirNotFound {
        /// Path that was expected to be a directory.
        path: Utf8PathBuf,
    },

    /// The output path cannot name a bundle file.
    #[error("invalid output path {path}: {reason}")]
    InvalidOutputPath {
        /// The offending output path.
        path: Utf8PathBuf,
        /// Description of why the path is unusable.
        reason: String,
    },

    /// The entry point is not expressible as an archive-relative path.
    #[error("invalid entry point {path}: {reason}")]
    InvalidEntryPoint {
        /// The offending entry point path.
        path: String,
        /// Description of why the path is unusable.
        reason: String,
    },

    /// Nothing matched the suffix filter and no entry point exists.
    #[error("nothing to bundle under {source_dir}: no file matches the suffix filter")]
    EmptySelection {
        /// Root of the scanned source tree.
        source_dir: Utf8PathBuf,
    },

    /// A digest string is not 64 lowercase hex characters.
    #[error("invalid digest: {reason}")]
    InvalidDigest {
        /// Description of the malformed value.
        reason: String,
    },

    /// The inspected file carries no payload marker.
    #[error("{path} is not a selfpack bundle: payload marker not found")]
    NotABundle {
        /// Path of the file that failed inspection.
        path: Utf8PathBuf,
    },

    /// Committing the staged bundle to its final path failed.
    #[error("failed to commit bundle to {path}: {reason}")]
    CommitFailed {
        /// Destination path of the failed commit.
        path: Utf8PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization of a manifest failed.
    #[error("manifest serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write operator output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`BundleError`].
pub type Result<T> = std::result::Result<T, BundleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_forbidden_names_the_flag() {
        let err = BundleError::WritesForbidden {
            flag: "SELFPACK_READONLY",
        };
        let msg = err.to_string();
        assert!(msg.contains("SELFPACK_READONLY"));
        assert!(msg.contains("unset"));
    }

    #[test]
    fn source_dir_not_found_includes_path() {
        let err = BundleError::SourceDirNotFound {
            path: Utf8PathBuf::from("/missing/tree"),
        };
        assert!(err.to_string().contains("/missing/tree"));
    }

    #[test]
    fn not_a_bundle_includes_path_and_marker_hint() {
        let err = BundleError::NotABundle {
            path: Utf8PathBuf::from("/tmp/random.bin"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/random.bin"));
        assert!(msg.contains("marker"));
    }

    #[test]
    fn commit_failed_includes_destination_and_reason() {
        let err = BundleError::CommitFailed {
            path: Utf8PathBuf::from("/tmp/bundle.run"),
            reason: "permission denied".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/bundle.run"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn write_failed_preserves_source() {
        let source = std::io::Error::other("broken pipe");
        let err = BundleError::WriteFailed { source };
        assert!(std::error::Error::source(&err).is_some());
    }
}
