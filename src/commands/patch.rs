//! `synthctl patch` - single-field partial updates.
//!
//! Exactly one field per invocation; the payload carries only that field
//! (nested under `configuration` where the field lives there) so
//! concurrent edits to other fields are never clobbered.

use crate::cli::{PatchArgs, PatchKind};
use crate::commands;
use anyhow::Result;
use serde_json::{json, Value};
use synthctl_client::{credentials, tests_api, ApiClient, ClientError};
use synthctl_model::bundle;

const VALID_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

pub fn run(args: &PatchArgs) -> Result<()> {
    match args.kind {
        PatchKind::Test => patch_test(args),
        PatchKind::Cred => patch_credential(args),
    }
}

fn patch_credential(args: &PatchArgs) -> Result<()> {
    let provided = [
        !args.applications.is_empty(),
        !args.websites.is_empty(),
        !args.mobile_apps.is_empty(),
    ];
    if provided.iter().filter(|set| **set).count() != 1 {
        return Err(ClientError::InvalidArgument(
            "specify exactly one of --applications, --websites or --mobile-apps".into(),
        )
        .into());
    }
    let client = commands::api_client(&args.auth)?;
    if !args.applications.is_empty() {
        credentials::patch_applications(&client, &args.id, &args.applications)?;
    } else if !args.websites.is_empty() {
        credentials::patch_websites(&client, &args.id, &args.websites)?;
    } else {
        credentials::patch_mobile_apps(&client, &args.id, &args.mobile_apps)?;
    }
    println!("credential \"{}\" updated", args.id);
    Ok(())
}

fn patch_test(args: &PatchArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;
    let mut payloads: Vec<Value> = Vec::new();

    if let Some(active) = &args.active {
        payloads.push(json!({"active": commands::parse_bool("--active", active)?}));
    }
    if let Some(frequency) = args.frequency {
        payloads.push(json!({
            "testFrequency": validated_frequency(&client, &args.id, frequency)?
        }));
    }
    if !args.location.is_empty() {
        payloads.push(json!({"locations": args.location}));
    }
    if let Some(label) = &args.label {
        payloads.push(json!({"label": label}));
    }
    if let Some(description) = &args.description {
        payloads.push(json!({"description": description}));
    }
    if let Some(retries) = args.retries {
        if !(0..=2).contains(&retries) {
            return Err(
                ClientError::InvalidArgument("retries should be in [0, 2]".into()).into(),
            );
        }
        payloads.push(configuration_field("retries", json!(retries)));
    }
    if let Some(interval) = args.retry_interval {
        if !(1..=10).contains(&interval) {
            return Err(ClientError::InvalidArgument(
                "retry interval should be in [1, 10]".into(),
            )
            .into());
        }
        payloads.push(configuration_field("retryInterval", json!(interval)));
    }
    if let Some(timeout) = &args.timeout {
        payloads.push(configuration_field("timeout", json!(timeout)));
    }
    if let Some(properties) = &args.custom_properties {
        let pairs = commands::split_pairs(properties)?;
        let map: serde_json::Map<String, Value> = pairs
            .into_iter()
            .map(|(key, value)| (key, json!(value)))
            .collect();
        payloads.push(json!({"customProperties": map}));
    }
    if let Some(operation) = &args.operation {
        let upper = operation.to_ascii_uppercase();
        if !VALID_METHODS.contains(&upper.as_str()) {
            return Err(ClientError::InvalidArgument(format!(
                "HTTP method \"{operation}\" is not allowed"
            ))
            .into());
        }
        payloads.push(configuration_field("operation", json!(upper)));
    }
    if let Some(mark) = &args.mark_synthetic_call {
        payloads.push(configuration_field(
            "markSyntheticCall",
            json!(commands::parse_bool("--mark-synthetic-call", mark)?),
        ));
    }
    if let Some(url) = &args.url {
        payloads.push(configuration_field("url", json!(url)));
    }
    if let Some(follow_redirect) = &args.follow_redirect {
        payloads.push(configuration_field(
            "followRedirect",
            json!(commands::parse_bool("--follow-redirect", follow_redirect)?),
        ));
    }
    if let Some(validation_string) = &args.validation_string {
        payloads.push(configuration_field(
            "validationString",
            json!(validation_string),
        ));
    }
    if let Some(expect_status) = args.expect_status {
        payloads.push(configuration_field("expectStatus", json!(expect_status)));
    }
    if let Some(expect_json) = &args.expect_json {
        payloads.push(configuration_field(
            "expectJson",
            Value::Object(commands::parse_object(expect_json)?),
        ));
    }
    if let Some(expect_match) = &args.expect_match {
        payloads.push(configuration_field("expectMatch", json!(expect_match)));
    }
    if let Some(expect_exists) = &args.expect_exists {
        payloads.push(configuration_field(
            "expectExists",
            json!(commands::parse_string_list(expect_exists)?),
        ));
    }
    if let Some(expect_not_empty) = &args.expect_not_empty {
        payloads.push(configuration_field(
            "expectNotEmpty",
            json!(commands::parse_string_list(expect_not_empty)?),
        ));
    }
    if let Some(allow_insecure) = &args.allow_insecure {
        payloads.push(configuration_field(
            "allowInsecure",
            json!(commands::parse_bool("--allow-insecure", allow_insecure)?),
        ));
    }
    if let Some(record_video) = &args.record_video {
        payloads.push(configuration_field(
            "recordVideo",
            json!(commands::parse_bool("--record-video", record_video)?),
        ));
    }
    if let Some(browser) = &args.browser {
        payloads.push(configuration_field("browser", json!(browser)));
    }
    if let Some(script) = &args.script {
        payloads.push(configuration_field(
            "script",
            json!(bundle::read_script_file(script)?),
        ));
    }
    if let Some(bundle_arg) = &args.bundle {
        let content = if bundle::is_zip_file(bundle_arg) {
            bundle::read_zip_file_to_base64(bundle_arg)?
        } else {
            bundle_arg.clone()
        };
        let entry = args.bundle_entry_file.as_deref().unwrap_or("index.js");
        payloads.push(configuration_field(
            "scripts",
            json!({"bundle": content, "scriptFile": entry}),
        ));
    } else if let Some(entry) = &args.bundle_entry_file {
        payloads.push(configuration_field(
            "scripts",
            json!({"scriptFile": entry}),
        ));
    }
    if let Some(hostname) = &args.hostname {
        payloads.push(configuration_field("hostname", json!(hostname)));
    }
    if let Some(port) = args.port {
        payloads.push(configuration_field("port", json!(port)));
    }
    if let Some(days) = args.remaining_days_check {
        payloads.push(configuration_field("daysRemainingCheck", json!(days)));
    }

    if payloads.len() != 1 {
        return Err(ClientError::InvalidArgument(
            "specify exactly one field to patch".into(),
        )
        .into());
    }
    tests_api::patch_test(&client, &args.id, &payloads[0])?;
    println!("test {} updated", args.id);
    Ok(())
}

fn configuration_field(name: &str, value: Value) -> Value {
    json!({"configuration": {name: value}})
}

/// The frequency bound depends on the test kind, so the test is fetched
/// first: SSL certificate checks accept up to a day, everything else two
/// hours.
fn validated_frequency(client: &ApiClient, test_id: &str, frequency: u32) -> Result<u32> {
    let fetched = tests_api::get_test(client, test_id)?;
    let ssl = fetched
        .first()
        .and_then(|test| test["configuration"]["syntheticType"].as_str())
        == Some("SSLCertificate");
    let max = if ssl { 1440 } else { 120 };
    if frequency == 0 || frequency > max {
        return Err(
            ClientError::InvalidArgument(format!("frequency should be in [1, {max}]")).into(),
        );
    }
    Ok(frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_fields_are_nested() {
        assert_eq!(
            configuration_field("retries", json!(2)),
            json!({"configuration": {"retries": 2}})
        );
    }
}
