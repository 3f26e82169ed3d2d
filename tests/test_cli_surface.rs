//! Argument-surface tests: every subcommand parses the flag
//! combinations the docs promise, and conflicting selections are
//! rejected before any network access.

use clap::Parser;
use synthctl::cli::{Cli, Commands, ConfigAction, DeleteKind, GetKind, UpdateKind};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("arguments should parse")
}

#[test]
fn config_set_with_named_profile() {
    let cli = parse(&[
        "synthctl", "config", "set", "--name", "prod", "--host",
        "https://synthetics.example.com", "-t", "token-1", "--default",
    ]);
    match cli.command {
        Commands::Config(args) => {
            assert_eq!(args.action, ConfigAction::Set);
            assert_eq!(args.name.as_deref(), Some("prod"));
            assert!(args.default);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn config_env_alias_still_parses() {
    let cli = parse(&["synthctl", "config", "use", "--env", "staging"]);
    match cli.command {
        Commands::Config(args) => assert_eq!(args.name.as_deref(), Some("staging")),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn get_test_with_filter_and_window() {
    let cli = parse(&[
        "synthctl",
        "get",
        "test",
        "--filter",
        "locationId=loc-1",
        "--window-size",
        "30m",
        "--show-result",
    ]);
    match cli.command {
        Commands::Get(args) => {
            assert_eq!(args.kind, GetKind::Test);
            assert_eq!(args.filter.as_deref(), Some("locationId=loc-1"));
            assert_eq!(args.window_size, "30m");
            assert!(args.show_result);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn get_result_takes_test_and_har() {
    let cli = parse(&[
        "synthctl", "get", "result", "result-1", "--test", "test-1", "--har",
    ]);
    match cli.command {
        Commands::Get(args) => {
            assert_eq!(args.kind, GetKind::Result);
            assert_eq!(args.id.as_deref(), Some("result-1"));
            assert_eq!(args.test.as_deref(), Some("test-1"));
            assert!(args.har);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn create_test_accepts_multiple_locations() {
    let cli = parse(&[
        "synthctl", "create", "test", "-t", "1", "--script", "check.js", "--location", "a", "b",
        "c",
    ]);
    match cli.command {
        Commands::Create(args) => assert_eq!(args.location, vec!["a", "b", "c"]),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn update_alert_enable_and_disable_conflict() {
    let result = Cli::try_parse_from([
        "synthctl", "update", "alert", "alert-1", "--enable", "--disable",
    ]);
    assert!(result.is_err());
}

#[test]
fn update_cred_with_value() {
    let cli = parse(&[
        "synthctl", "update", "cred", "db-password", "--value", "hunter2",
    ]);
    match cli.command {
        Commands::Update(args) => {
            assert_eq!(args.kind, UpdateKind::Cred);
            assert_eq!(args.id, "db-password");
            assert_eq!(args.value.as_deref(), Some("hunter2"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn delete_selectors_are_mutually_exclusive() {
    assert!(Cli::try_parse_from([
        "synthctl",
        "delete",
        "test",
        "--match-regex",
        "^nightly-",
        "--match-location",
        "loc-1",
    ])
    .is_err());
    assert!(Cli::try_parse_from([
        "synthctl",
        "delete",
        "test",
        "--match-location",
        "loc-1",
        "--no-locations",
    ])
    .is_err());
}

#[test]
fn delete_takes_multiple_ids() {
    let cli = parse(&["synthctl", "delete", "alert", "a-1", "a-2"]);
    match cli.command {
        Commands::Delete(args) => {
            assert_eq!(args.kind, DeleteKind::Alert);
            assert_eq!(args.ids, vec!["a-1", "a-2"]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn auth_flags_are_shared_across_subcommands() {
    let cli = parse(&[
        "synthctl",
        "get",
        "test",
        "--host",
        "https://synthetics.example.com",
        "--token",
        "tok",
        "--verify-tls",
    ]);
    match cli.command {
        Commands::Get(args) => {
            assert_eq!(
                args.auth.host.as_deref(),
                Some("https://synthetics.example.com")
            );
            assert_eq!(args.auth.token.as_deref(), Some("tok"));
            assert!(args.auth.verify_tls);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
