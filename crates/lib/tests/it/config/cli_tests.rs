//! Command-line round trips through clap.

use clap::{Arg, ArgAction, Command};
use pathmap::{Config, Tree, Value};

fn training() -> Tree {
    Tree::new()
        .with(
            "train",
            Tree::new()
                .with("lr", 0.1)
                .with("epochs", 10)
                .with("optimizer", "sgd")
                .with("shuffle", true)
                .with("milestones", vec![3, 6]),
        )
        .with("name", Value::Null)
        .with(
            "_ARGUMENT_SPECIFICATION",
            Tree::new()
                .with("train;lr", Tree::new().with("flag", "lr"))
                .with("train;optimizer", Tree::new().with("choices", vec!["sgd", "adam"]))
                .with("train;epochs", Tree::new().with("choices", vec![10, 20])),
        )
}

fn command() -> Command {
    Command::new("train").no_binary_name(true)
}

#[test]
fn test_no_flags_changes_nothing() {
    let mut config = Config::new(training()).unwrap();
    let before = config.clone();
    config.parse_from(command(), Vec::<String>::new()).unwrap();
    assert_eq!(config, before);
}

#[test]
fn test_every_kind_of_flag() {
    let mut config = Config::new(training()).unwrap();
    config
        .parse_from(
            command(),
            [
                "--lr",
                "0.5",
                "--train__optimizer",
                "adam",
                "--train__epochs",
                "20",
                "--train__shuffle",
                "0",
                "--train__milestones",
                "1",
                "2",
                "4",
                "--name",
                "baseline",
            ],
        )
        .unwrap();

    assert_eq!(config.get("train;lr").unwrap(), 0.5);
    assert_eq!(config.get("train;optimizer").unwrap(), "adam");
    assert_eq!(config.get("train;epochs").unwrap(), 20i64);
    assert_eq!(config.get("train;shuffle").unwrap(), false);
    assert_eq!(
        config.get_value("train;milestones"),
        Some(&Value::from(vec![1, 2, 4]))
    );
    assert_eq!(config.get("name").unwrap(), "baseline");
}

#[test]
fn test_invalid_values_are_cli_errors() {
    for args in [
        ["--train__optimizer", "rmsprop"],
        ["--train__epochs", "15"],
        ["--train__shuffle", "2"],
        ["--train__lr", "0.5"],
    ] {
        let mut config = Config::new(training()).unwrap();
        let err = config.parse_from(command(), args).unwrap_err();
        assert!(err.is_cli_error(), "{args:?} should be rejected");
    }
}

#[test]
fn test_apply_matches_counts_changes() {
    let mut config = Config::new(training()).unwrap();
    let matches = config
        .command(command())
        .try_get_matches_from(["--lr", "0.1", "--train__epochs", "20"])
        .unwrap();
    assert_eq!(config.apply_matches(&matches).unwrap(), 1);
}

#[test]
fn test_caller_arguments_pass_through() {
    let mut config = Config::new(training()).unwrap();
    let command = command().arg(
        Arg::new("dry-run")
            .long("dry-run")
            .action(ArgAction::SetTrue),
    );
    let matches = config
        .parse_from(command, ["--dry-run", "--train__epochs", "20"])
        .unwrap();

    assert!(matches.get_flag("dry-run"));
    assert_eq!(config.get_value("train;epochs"), Some(&Value::Int(20)));
}

#[test]
fn test_help_lists_config_flags() {
    let config = Config::new(training()).unwrap();
    let help = config.command(command()).render_help().to_string();
    for flag in ["--lr", "--train__optimizer", "--train__milestones", "--name"] {
        assert!(help.contains(flag), "missing {flag} in help");
    }
}
