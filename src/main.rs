//! selfpack CLI entrypoint.
//!
//! This binary packages a source tree into a self-extracting executable
//! bundle and prints the committed bundle's manifest for operator
//! verification. The `list` subcommand inspects an existing bundle.

use clap::Parser;
use selfpack::bundle::build_bundle;
use selfpack::cli::{BuildArgs, Cli, Command, ListArgs};
use selfpack::config::{self, BuildConfig};
use selfpack::error::Result;
use selfpack::manifest::read_manifest;
use selfpack::output;
use selfpack::selection::select_sources;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, out: &mut dyn Write, err_out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Some(Command::List(args)) => run_list(args, out),
        Some(Command::Build(args)) => run_build(args, out, err_out),
        None => run_build(&cli.build, out, err_out),
    }
}

/// Build a bundle: resolve configuration, delegate to the builder, and
/// report the manifest. The host readonly flag is read once here and
/// handed to the builder as a value.
fn run_build(args: &BuildArgs, out: &mut dyn Write, err_out: &mut dyn Write) -> Result<()> {
    let readonly_guard = config::readonly_from_env();
    let build_config = BuildConfig::from_args(args, readonly_guard)?;

    if args.dry_run {
        let selection = select_sources(&build_config)?;
        return output::render_dry_run(&build_config, &selection, out);
    }

    let outcome = build_bundle(&build_config)?;

    if outcome.entry_point_missing {
        write_stderr_line(err_out, output::entry_warning(&build_config.entry_point));
    }
    if !args.quiet {
        output::render_report(&outcome, out)?;
    }
    Ok(())
}

/// Print the manifest of an existing bundle, as text or JSON.
fn run_list(args: &ListArgs, out: &mut dyn Write) -> Result<()> {
    let manifest = read_manifest(&args.bundle)?;
    if args.json {
        output::render_manifest_json(&manifest, out)
    } else {
        output::render_manifest_text(&manifest, out)
    }
}

fn exit_code_for_run_result(result: Result<()>, err_out: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(err_out, format!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(err_out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(err_out, "{message}").is_err() {
        // Best-effort diagnostics; ignore write failures.
    }
}
