//! Per-subcommand orchestration.
//!
//! Each submodule owns one top-level subcommand and is a thin layer over
//! the member crates: resolve the connection, build or fetch payloads,
//! call the client, print the outcome. Nothing in here exits the
//! process; errors bubble up to `cli::run` for exit code mapping.

pub mod config;
pub mod create;
pub mod delete;
pub mod get;
pub mod patch;
pub mod update;

use crate::cli::AuthArgs;
use anyhow::Result;
use serde_json::{Map, Value};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use synthctl_client::{ApiClient, ClientError, DeleteOutcome};
use synthctl_config::{resolve_auth, ProfileStore};

/// Build an API client from the auth flags.
///
/// An explicit `--host`/`--token` pair bypasses the profile store
/// entirely; otherwise the store is consulted (named profile via
/// `--use-env`, environment variables, or the default profile).
pub(crate) fn api_client(auth: &AuthArgs) -> Result<ApiClient> {
    if let (Some(host), Some(token)) = (&auth.host, &auth.token) {
        return Ok(ApiClient::new(host, token, auth.verify_tls)?);
    }
    let store = ProfileStore::open()?;
    let resolved = resolve_auth(&store, auth.use_env.as_deref())?;
    Ok(ApiClient::new(
        &resolved.host,
        &resolved.token,
        auth.verify_tls,
    )?)
}

/// Interactive yes/no prompt on stdin. Only "yes" and "y" confirm.
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [yes/no] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "yes" || answer == "y")
}

/// Strict boolean argument: only "true"/"false" (case-insensitive).
pub(crate) fn parse_bool(option: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ClientError::InvalidArgument(format!(
            "{option} should be true or false, got \"{value}\""
        ))
        .into()),
    }
}

/// Split `key=value,key2=value2` into pairs. Empty keys or values are
/// rejected before anything reaches the wire.
pub(crate) fn split_pairs(input: &str) -> Result<Vec<(String, String)>> {
    input
        .split(',')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(ClientError::InvalidArgument(format!(
                "expected key=value pairs, got \"{pair}\""
            ))
            .into()),
        })
        .collect()
}

/// Parse a JSON-object argument.
pub(crate) fn parse_object(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(ClientError::InvalidArgument("expected a JSON object".into()).into()),
    }
}

/// Parse a JSON string-array argument.
pub(crate) fn parse_string_list(text: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(text)?)
}

/// Print a delete batch outcome per item, then the tally.
pub(crate) fn report_deletes(outcomes: &[(String, DeleteOutcome)], started: Instant) {
    let mut deleted = 0usize;
    for (id, outcome) in outcomes {
        match outcome {
            DeleteOutcome::Deleted => {
                deleted += 1;
                println!("deleted {id}");
            }
            DeleteOutcome::NotFound => println!("{id} does not exist"),
            DeleteOutcome::Failed(status) => println!("delete {id} failed, status {status}"),
        }
    }
    println!(
        "total deleted: {deleted}, time used: {}ms",
        started.elapsed().as_millis()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_split_and_trimmed() {
        let pairs = split_pairs("team=sre, env=prod").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("team".to_string(), "sre".to_string()),
                ("env".to_string(), "prod".to_string())
            ]
        );
    }

    #[test]
    fn empty_key_or_value_is_rejected() {
        assert!(split_pairs("=prod").is_err());
        assert!(split_pairs("team=").is_err());
        assert!(split_pairs("no-separator").is_err());
    }

    #[test]
    fn booleans_are_strict() {
        assert!(parse_bool("--active", "TRUE").unwrap());
        assert!(!parse_bool("--active", "false").unwrap());
        assert!(parse_bool("--active", "yes").is_err());
    }

    #[test]
    fn object_arguments_must_be_objects() {
        assert!(parse_object(r#"{"a": 1}"#).is_ok());
        assert!(parse_object(r#"[1, 2]"#).is_err());
        assert!(parse_string_list(r#"["a", "b"]"#).is_ok());
        assert!(parse_string_list(r#"{"a": 1}"#).is_err());
    }
}
