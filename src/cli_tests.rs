//! Unit tests for the CLI argument definitions.

use super::*;
use rstest::rstest;

#[test]
fn bare_invocation_builds_with_defaults() {
    let cli = Cli::parse_from(["selfpack"]);
    assert!(cli.command.is_none());

    let args = cli.build_args();
    assert_eq!(args.source_dir.as_str(), ".");
    assert_eq!(args.output.as_str(), "bundle.run");
    assert_eq!(args.entry, "bin/main");
    assert!(args.ext.is_empty());
    assert!(args.name.is_none());
    assert!(!args.dry_run);
    assert!(!args.quiet);
}

#[test]
fn build_subcommand_overrides_flattened_args() {
    let cli = Cli::parse_from(["selfpack", "build", "--output", "tool.run"]);
    assert_eq!(cli.build_args().output.as_str(), "tool.run");
}

#[test]
fn ext_flag_is_repeatable() {
    let cli = Cli::parse_from(["selfpack", "--ext", "php", "--ext", "md"]);
    assert_eq!(cli.build_args().ext, vec!["php".to_owned(), "md".to_owned()]);
}

#[test]
fn name_flag_sets_logical_name() {
    let cli = Cli::parse_from(["selfpack", "--name", "tool", "--output", "dist/tool.run"]);
    let args = cli.build_args();
    assert_eq!(args.name.as_deref(), Some("tool"));
    assert_eq!(args.output.as_str(), "dist/tool.run");
}

#[test]
fn quiet_conflicts_with_dry_run() {
    Cli::try_parse_from(["selfpack", "--quiet", "--dry-run"])
        .expect_err("expected clap to reject --quiet with --dry-run");
}

#[test]
fn list_subcommand_requires_bundle_path() {
    Cli::try_parse_from(["selfpack", "list"])
        .expect_err("expected clap to reject list without a bundle path");
}

#[rstest]
#[case::text(&["selfpack", "list", "tool.run"], false)]
#[case::json(&["selfpack", "list", "tool.run", "--json"], true)]
fn list_subcommand_parses_json_flag(#[case] argv: &[&str], #[case] expect_json: bool) {
    let cli = Cli::parse_from(argv);
    match cli.command {
        Some(Command::List(args)) => {
            assert_eq!(args.bundle.as_str(), "tool.run");
            assert_eq!(args.json, expect_json);
        }
        other => panic!("expected list subcommand, got {other:?}"),
    }
}

#[test]
fn build_args_accessor_falls_back_for_list() {
    let cli = Cli::parse_from(["selfpack", "list", "tool.run"]);
    assert_eq!(cli.build_args().output.as_str(), "bundle.run");
}
