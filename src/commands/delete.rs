//! `synthctl delete` - batch deletes with per-item reporting.
//!
//! Tests can also be selected by label regex, by sole location, or by
//! having no location at all; those selections are confirmed
//! interactively before anything is deleted.

use crate::cli::{DeleteArgs, DeleteKind};
use crate::commands;
use anyhow::Result;
use std::time::Instant;
use synthctl_client::tests_api::{self, MatchedTest};
use synthctl_client::{alerts, credentials, locations, ApiClient, ClientError};

pub fn run(args: &DeleteArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;
    let started = Instant::now();
    match args.kind {
        DeleteKind::Test => delete_tests(&client, args, started),
        DeleteKind::Location => {
            require_ids(args, "location")?;
            let outcomes = locations::delete_locations(&client, &args.ids)?;
            commands::report_deletes(&outcomes, started);
            Ok(())
        }
        DeleteKind::Cred => {
            require_ids(args, "credential")?;
            let outcomes = credentials::delete_credentials(&client, &args.ids)?;
            commands::report_deletes(&outcomes, started);
            Ok(())
        }
        DeleteKind::Alert => {
            require_ids(args, "alert")?;
            // Alert ids can start with a dash; strip the protective
            // leading space used to get them past the shell.
            let ids: Vec<String> = args
                .ids
                .iter()
                .map(|id| id.trim_start().to_string())
                .collect();
            let outcomes = alerts::delete_alerts(&client, &ids)?;
            commands::report_deletes(&outcomes, started);
            Ok(())
        }
    }
}

fn require_ids(args: &DeleteArgs, noun: &str) -> Result<()> {
    if args.ids.is_empty() {
        return Err(ClientError::InvalidArgument(format!("no {noun} specified")).into());
    }
    Ok(())
}

fn delete_tests(client: &ApiClient, args: &DeleteArgs, started: Instant) -> Result<()> {
    if let Some(pattern) = &args.match_regex {
        let tests = tests_api::list_tests(client, None)?;
        let matched = tests_api::match_tests_by_label(&tests, pattern)?;
        return delete_matched(client, &matched, started);
    }
    if let Some(location) = &args.match_location {
        let tests = tests_api::list_tests(client, None)?;
        let matched = tests_api::match_tests_by_location(&tests, location);
        return delete_matched(client, &matched, started);
    }
    if args.no_locations {
        let tests = tests_api::list_tests(client, None)?;
        let matched = tests_api::match_tests_without_location(&tests);
        return delete_matched(client, &matched, started);
    }

    require_ids(args, "test")?;
    let outcomes = tests_api::delete_tests(client, &args.ids)?;
    commands::report_deletes(&outcomes, started);
    Ok(())
}

fn delete_matched(client: &ApiClient, matched: &[MatchedTest], started: Instant) -> Result<()> {
    if matched.is_empty() {
        println!("no tests matched");
        return Ok(());
    }
    for test in matched {
        println!("{}  {}", test.id, test.label);
    }
    println!("total match: {}", matched.len());
    if !commands::confirm("delete these tests?")? {
        println!("canceled");
        return Ok(());
    }
    let ids: Vec<String> = matched.iter().map(|test| test.id.clone()).collect();
    let outcomes = tests_api::delete_tests(client, &ids)?;
    commands::report_deletes(&outcomes, started);
    Ok(())
}
