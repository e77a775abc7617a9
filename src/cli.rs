//! CLI argument definitions for selfpack.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary small and focused
//! on orchestration.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Package a source tree into a self-extracting executable bundle.
#[derive(Parser, Debug)]
#[command(name = "selfpack")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package a source tree into a self-extracting executable bundle.\n\n",
    "selfpack collects every file under the source directory whose name ",
    "matches the suffix filter, adds the binary entry point, and writes a ",
    "single executable output file. The file starts with a bootstrap shell ",
    "stub; running it extracts the embedded payload and hands control to ",
    "the entry point.\n\n",
    "Bundle writes can be disabled host-wide by setting SELFPACK_READONLY; ",
    "the build then fails before touching the filesystem.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Bundle the current directory with the default filter:\n",
    "    $ selfpack\n\n",
    "  Bundle a project with a custom entry point and output name:\n",
    "    $ selfpack --source-dir ./tool --entry bin/tool --output tool.run\n\n",
    "  Restrict the filter to source and documentation files:\n",
    "    $ selfpack --ext php --ext md\n\n",
    "  Preview the selection without writing anything:\n",
    "    $ selfpack --dry-run\n\n",
    "  Inspect an existing bundle:\n",
    "    $ selfpack list tool.run\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Build arguments (used when no subcommand is given).
    #[command(flatten)]
    pub build: BuildArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a bundle (default when no subcommand given).
    Build(BuildArgs),

    /// List the contents of an existing bundle.
    List(ListArgs),
}

/// Arguments for the build command.
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Root of the source tree to bundle.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub source_dir: Utf8PathBuf,

    /// Path of the bundle to create.
    #[arg(short, long, value_name = "FILE", default_value = "bundle.run")]
    pub output: Utf8PathBuf,

    /// Archive-relative path of the entry point the stub delegates to.
    #[arg(short, long, value_name = "PATH", default_value = "bin/main")]
    pub entry: String,

    /// Filename suffix to include (repeatable; replaces the default set).
    #[arg(long = "ext", value_name = "SUFFIX")]
    pub ext: Vec<String>,

    /// Logical bundle name used by the stub [default: output filename].
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Show what would be bundled and exit without writing.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress the success report (warnings and errors still shown).
    #[arg(short, long, conflicts_with = "dry_run")]
    pub quiet: bool,
}

/// Arguments for the list command.
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Path of the bundle to inspect.
    #[arg(value_name = "BUNDLE")]
    pub bundle: Utf8PathBuf,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Returns the effective build arguments.
    ///
    /// If a `Build` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened build arguments so that a bare
    /// `selfpack` invocation builds with defaults.
    #[must_use]
    pub fn build_args(&self) -> &BuildArgs {
        match &self.command {
            Some(Command::Build(args)) => args,
            Some(Command::List(_)) | None => &self.build,
        }
    }
}

impl Default for BuildArgs {
    /// Creates a `BuildArgs` instance matching a bare CLI invocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use selfpack::cli::BuildArgs;
    ///
    /// let args = BuildArgs::default();
    /// assert_eq!(args.output.as_str(), "bundle.run");
    /// assert!(args.ext.is_empty());
    /// ```
    fn default() -> Self {
        Self {
            source_dir: Utf8PathBuf::from("."),
            output: Utf8PathBuf::from("bundle.run"),
            entry: "bin/main".to_owned(),
            ext: Vec::new(),
            name: None,
            dry_run: false,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
