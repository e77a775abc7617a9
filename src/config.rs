//! Explicit build configuration for the bundle builder.
//!
//! The builder never reads ambient process state: the host write-protection
//! flag is parsed here and handed to [`crate::bundle`] as a plain value so
//! the component stays testable in isolation.

use crate::cli::BuildArgs;
use crate::error::{BundleError, Result};
use camino::Utf8PathBuf;

/// Environment flag that disables bundle writes host-wide.
pub const READONLY_FLAG: &str = "SELFPACK_READONLY";

/// Suffixes selected when no `--ext` flag is given: source code,
/// structured data, documentation, and dependency-lock files.
pub const DEFAULT_SUFFIXES: [&str; 4] = ["php", "json", "md", "lock"];

/// Fully-resolved inputs for one bundle build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Root of the source tree to scan.
    pub source_dir: Utf8PathBuf,
    /// Destination path of the committed bundle.
    pub output_path: Utf8PathBuf,
    /// Logical bundle name the stub maps itself to.
    pub bundle_name: String,
    /// Archive-relative path of the force-included entry point.
    pub entry_point: String,
    /// Filename suffixes to select, without leading dots.
    pub suffixes: Vec<String>,
    /// When true, the builder refuses to write before any other action.
    pub readonly_guard: bool,
}

impl BuildConfig {
    /// Resolve CLI arguments and the host flag into a build configuration.
    ///
    /// Performs no filesystem access; existence checks belong to the
    /// selection pass so the readonly guard stays the builder's first
    /// action.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::InvalidOutputPath`] when the output path has
    /// no filename component, and [`BundleError::InvalidEntryPoint`] when
    /// the entry point is absolute or empty.
    pub fn from_args(args: &BuildArgs, readonly_guard: bool) -> Result<Self> {
        let bundle_name = match &args.name {
            Some(name) => name.clone(),
            None => output_filename(&args.output)?,
        };

        validate_entry_point(&args.entry)?;

        let suffixes = if args.ext.is_empty() {
            DEFAULT_SUFFIXES.iter().map(|s| (*s).to_owned()).collect()
        } else {
            args.ext.iter().map(|s| normalize_suffix(s)).collect()
        };

        Ok(Self {
            source_dir: args.source_dir.clone(),
            output_path: args.output.clone(),
            bundle_name,
            entry_point: args.entry.clone(),
            suffixes,
            readonly_guard,
        })
    }
}

/// Extract the filename component of the output path.
fn output_filename(output: &Utf8PathBuf) -> Result<String> {
    output
        .file_name()
        .map(std::borrow::ToOwned::to_owned)
        .ok_or_else(|| BundleError::InvalidOutputPath {
            path: output.clone(),
            reason: "path has no filename component".to_owned(),
        })
}

/// Reject entry points that cannot live inside the archive.
fn validate_entry_point(entry: &str) -> Result<()> {
    if entry.is_empty() {
        return Err(BundleError::InvalidEntryPoint {
            path: entry.to_owned(),
            reason: "entry point is empty".to_owned(),
        });
    }
    if entry.starts_with('/') {
        return Err(BundleError::InvalidEntryPoint {
            path: entry.to_owned(),
            reason: "entry point must be relative to the source tree".to_owned(),
        });
    }
    Ok(())
}

/// Strip a leading dot so `--ext .php` and `--ext php` select the same files.
fn normalize_suffix(suffix: &str) -> String {
    suffix.strip_prefix('.').unwrap_or(suffix).to_owned()
}

/// Interpret the readonly flag's value the way loose INI-style booleans
/// are read: anything other than unset, empty, `0`, or `false`
/// (case-insensitive) blocks the build.
#[must_use]
pub fn is_truthy(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(raw) => {
            let trimmed = raw.trim();
            !(trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("false"))
        }
    }
}

/// Read the readonly guard from the process environment.
///
/// This is the only ambient read in the crate; the result is passed into
/// [`BuildConfig`] so everything downstream takes the flag as a value.
#[must_use]
pub fn readonly_from_env() -> bool {
    is_truthy(std::env::var(READONLY_FLAG).ok().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::BuildArgs;
    use rstest::rstest;

    #[test]
    fn default_args_resolve_to_default_suffixes() {
        let config =
            BuildConfig::from_args(&BuildArgs::default(), false).expect("config resolves");
        assert_eq!(config.suffixes, ["php", "json", "md", "lock"]);
        assert_eq!(config.bundle_name, "bundle.run");
        assert!(!config.readonly_guard);
    }

    #[test]
    fn explicit_ext_replaces_default_set() {
        let args = BuildArgs {
            ext: vec![".php".to_owned(), "md".to_owned()],
            ..BuildArgs::default()
        };
        let config = BuildConfig::from_args(&args, false).expect("config resolves");
        assert_eq!(config.suffixes, ["php", "md"]);
    }

    #[test]
    fn bundle_name_defaults_to_output_filename() {
        let args = BuildArgs {
            output: "dist/tool.run".into(),
            ..BuildArgs::default()
        };
        let config = BuildConfig::from_args(&args, false).expect("config resolves");
        assert_eq!(config.bundle_name, "tool.run");
    }

    #[test]
    fn explicit_name_wins_over_output_filename() {
        let args = BuildArgs {
            name: Some("tool".to_owned()),
            ..BuildArgs::default()
        };
        let config = BuildConfig::from_args(&args, false).expect("config resolves");
        assert_eq!(config.bundle_name, "tool");
    }

    #[test]
    fn output_without_filename_is_rejected() {
        let args = BuildArgs {
            output: "/".into(),
            ..BuildArgs::default()
        };
        let err = BuildConfig::from_args(&args, false).expect_err("expected rejection");
        assert!(matches!(err, BundleError::InvalidOutputPath { .. }));
    }

    #[rstest]
    #[case::absolute("/usr/bin/tool")]
    #[case::empty("")]
    fn unusable_entry_points_are_rejected(#[case] entry: &str) {
        let args = BuildArgs {
            entry: entry.to_owned(),
            ..BuildArgs::default()
        };
        let err = BuildConfig::from_args(&args, false).expect_err("expected rejection");
        assert!(matches!(err, BundleError::InvalidEntryPoint { .. }));
    }

    #[rstest]
    #[case::unset(None, false)]
    #[case::empty(Some(""), false)]
    #[case::zero(Some("0"), false)]
    #[case::false_word(Some("false"), false)]
    #[case::false_mixed_case(Some("False"), false)]
    #[case::one(Some("1"), true)]
    #[case::truthy_word(Some("on"), true)]
    #[case::whitespace_padded(Some(" 1 "), true)]
    fn is_truthy_matches_ini_style_booleans(#[case] value: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_truthy(value), expected);
    }

    #[test]
    fn readonly_from_env_reads_the_flag() {
        temp_env::with_var(READONLY_FLAG, Some("1"), || {
            assert!(readonly_from_env());
        });
        temp_env::with_var(READONLY_FLAG, None::<&str>, || {
            assert!(!readonly_from_env());
        });
    }
}
