use apiwatch_core::models::{Period, Severity, SeveritySelection, TimeWindow};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser};

use super::*;

#[test]
fn summary_parses_repeatable_severity_and_period() {
    let cli = Cli::try_parse_from([
        "apiwatch",
        "summary",
        "--demo",
        "--severity",
        "critica",
        "--severity",
        "HIGH",
        "--period",
        "2024-01",
    ])
    .expect("parse");
    let Commands::Summary(args) = cli.command else {
        panic!("expected summary command");
    };
    assert!(args.source.demo);
    let criteria = args.filter.criteria();
    assert_eq!(
        criteria.severities,
        SeveritySelection::only([Severity::Critical, Severity::High])
    );
    assert_eq!(
        criteria.time,
        TimeWindow::Month {
            period: Period::new(2024, 1).expect("period")
        }
    );
}

#[test]
fn date_range_requires_both_bounds() {
    let parsed = Cli::try_parse_from(["apiwatch", "records", "--demo", "--from", "2024-01-01"]);
    assert!(parsed.is_err(), "--from without --to must be rejected");
}

#[test]
fn reversed_date_range_is_normalized() {
    let cli = Cli::try_parse_from([
        "apiwatch",
        "records",
        "--demo",
        "--from",
        "2024-02-01",
        "--to",
        "2024-01-01",
        "--limit",
        "3",
    ])
    .expect("parse");
    let Commands::Records(args) = cli.command else {
        panic!("expected records command");
    };
    assert_eq!(args.limit, Some(3));
    let date = |m, d| NaiveDate::from_ymd_opt(2024, m, d).expect("date");
    assert_eq!(
        args.filter.criteria().time,
        TimeWindow::DateRange {
            start: date(1, 1),
            end: date(2, 1)
        }
    );
}

#[test]
fn source_flags_are_mutually_exclusive() {
    let parsed = Cli::try_parse_from([
        "apiwatch",
        "summary",
        "--file",
        "errors.xlsx",
        "--url",
        "https://example.invalid/pub?output=csv",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn no_severity_conflicts_with_explicit_levels() {
    let parsed = Cli::try_parse_from([
        "apiwatch",
        "summary",
        "--demo",
        "--no-severity",
        "--severity",
        "LOW",
    ]);
    assert!(parsed.is_err());

    let cli = Cli::try_parse_from(["apiwatch", "summary", "--demo", "--no-severity"])
        .expect("parse");
    let Commands::Summary(args) = cli.command else {
        panic!("expected summary command");
    };
    assert_eq!(
        args.filter.criteria().severities,
        SeveritySelection::only(Vec::new())
    );
}

#[test]
fn period_and_latest_period_conflict() {
    let parsed = Cli::try_parse_from([
        "apiwatch",
        "export",
        "--demo",
        "--period",
        "2024-01",
        "--latest-period",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn invalid_period_is_rejected() {
    let parsed = Cli::try_parse_from(["apiwatch", "summary", "--demo", "--period", "2024-13"]);
    assert!(parsed.is_err());
}

#[test]
fn web_defaults_to_loopback() {
    let cli = Cli::try_parse_from(["apiwatch", "--root", "/tmp/aw", "web"]).expect("parse");
    assert_eq!(cli.root, std::path::PathBuf::from("/tmp/aw"));
    let Commands::Web(args) = cli.command else {
        panic!("expected web command");
    };
    assert_eq!(args.host, "127.0.0.1");
    assert_eq!(args.port, 8787);
}

#[test]
fn type_filter_is_trimmed_into_criteria() {
    let cli = Cli::try_parse_from(["apiwatch", "summary", "--demo", "--type", " TIMEOUT "])
        .expect("parse");
    let Commands::Summary(args) = cli.command else {
        panic!("expected summary command");
    };
    assert_eq!(args.filter.criteria().error_type.as_deref(), Some("TIMEOUT"));
}

#[test]
fn every_subcommand_has_help_text() {
    let command = Cli::command();
    let undocumented = command
        .get_subcommands()
        .filter(|sub| sub.get_about().is_none())
        .map(|sub| sub.get_name().to_string())
        .collect::<Vec<_>>();
    assert!(undocumented.is_empty(), "missing about: {undocumented:?}");
}
