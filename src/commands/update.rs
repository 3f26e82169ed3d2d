//! `synthctl update` - full updates of tests, smart alerts and
//! credentials.
//!
//! Tests and alerts are fetched, mutated field-by-field through the
//! updaters and PUT back whole. Credentials have no update endpoint:
//! the client replaces them with a delete-then-recreate.

use crate::cli::{UpdateArgs, UpdateKind};
use crate::commands;
use anyhow::Result;
use serde_json::Value;
use synthctl_client::alerts::{self, Toggle};
use synthctl_client::{credentials, tests_api, ClientError};
use synthctl_model::{AlertUpdater, CredentialConfigBuilder, TestUpdater};

pub fn run(args: &UpdateArgs) -> Result<()> {
    match args.kind {
        UpdateKind::Test => update_test(args),
        UpdateKind::Alert => update_alert(args),
        UpdateKind::Cred => update_credential(args),
    }
}

fn update_test(args: &UpdateArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;

    let payload = if let Some(path) = &args.from_file {
        let text = std::fs::read_to_string(path)?;
        // Parsed and re-serialized so a malformed file fails here, not
        // with an opaque backend 400.
        let value: Value = serde_json::from_str(&text)?;
        value.to_string()
    } else {
        let fetched = tests_api::get_test(&client, &args.id)?;
        let Some(current) = fetched.into_iter().next() else {
            return Err(ClientError::NotFound(format!("test {}", args.id)).into());
        };
        let mut updater = TestUpdater::new(current)?;
        apply_test_fields(&mut updater, args)?;
        updater.to_json()
    };

    tests_api::update_test(&client, &args.id, payload)?;
    println!("test {} updated", args.id);
    Ok(())
}

fn apply_test_fields(updater: &mut TestUpdater, args: &UpdateArgs) -> Result<()> {
    if let Some(active) = &args.active {
        updater.update_active(commands::parse_bool("--active", active)?);
    }
    if let Some(frequency) = args.frequency {
        updater.update_frequency(frequency)?;
    }
    if !args.location.is_empty() {
        updater.update_locations(&args.location)?;
    }
    if let Some(label) = &args.label {
        updater.update_label(label)?;
    }
    if let Some(description) = &args.description {
        updater.update_description(description)?;
    }
    if let Some(retries) = args.retries {
        updater.update_retries(retries)?;
    }
    if let Some(interval) = args.retry_interval {
        updater.update_retry_interval(interval)?;
    }
    if let Some(timeout) = &args.timeout {
        updater.update_timeout(timeout)?;
    }
    if let Some(properties) = &args.custom_properties {
        updater.update_custom_properties(&commands::split_pairs(properties)?)?;
    }
    updater.update_applications(&args.apps);
    updater.update_websites(&args.websites);
    updater.update_mobile_apps(&args.mobile_apps);
    if let Some(operation) = &args.operation {
        updater.update_operation(operation)?;
    }
    if let Some(mark) = &args.mark_synthetic_call {
        updater.update_mark_synthetic_call(commands::parse_bool("--mark-synthetic-call", mark)?);
    }
    if let Some(url) = &args.url {
        updater.update_url(url)?;
    }
    if let Some(follow_redirect) = &args.follow_redirect {
        updater
            .update_follow_redirect(commands::parse_bool("--follow-redirect", follow_redirect)?);
    }
    if let Some(headers) = &args.headers {
        updater.update_headers(&commands::split_pairs(headers)?)?;
    }
    if let Some(body) = &args.body {
        updater.update_body(body)?;
    }
    if let Some(expect_status) = args.expect_status {
        updater.update_expect_status(expect_status);
    }
    if let Some(expect_json) = &args.expect_json {
        updater.update_expect_json(expect_json)?;
    }
    if let Some(expect_match) = &args.expect_match {
        updater.update_expect_match(expect_match);
    }
    if let Some(expect_exists) = &args.expect_exists {
        updater.update_expect_exists(expect_exists)?;
    }
    if let Some(expect_not_empty) = &args.expect_not_empty {
        updater.update_expect_not_empty(expect_not_empty)?;
    }
    if let Some(validation_string) = &args.validation_string {
        updater.update_validation_string(validation_string)?;
    }
    if let Some(allow_insecure) = &args.allow_insecure {
        updater.update_allow_insecure(commands::parse_bool("--allow-insecure", allow_insecure)?);
    }
    if let Some(record_video) = &args.record_video {
        updater.update_record_video(commands::parse_bool("--record-video", record_video)?);
    }
    if let Some(browser) = &args.browser {
        updater.update_browser(browser)?;
    }
    if let Some(script) = &args.script {
        updater.update_script_from_file(script)?;
    }
    if let Some(bundle) = &args.bundle {
        updater.update_bundle(bundle)?;
    }
    if let Some(entry_file) = &args.bundle_entry_file {
        updater.update_bundle_entry_file(entry_file)?;
    }
    if let Some(hostname) = &args.hostname {
        updater.update_host(hostname);
    }
    if let Some(port) = args.port {
        updater.update_port(port);
    }
    if let Some(days) = args.remaining_days_check {
        updater.update_remaining_days(days);
    }
    Ok(())
}

fn update_alert(args: &UpdateArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;
    // Alert ids can start with a dash; a protective leading space used to
    // get it past the shell is stripped here.
    let alert_id = args.id.trim_start();

    if args.enable {
        alerts::toggle_alert(&client, alert_id, Toggle::Enable)?;
        println!("smart alert {alert_id} enabled");
        return Ok(());
    }
    if args.disable {
        alerts::toggle_alert(&client, alert_id, Toggle::Disable)?;
        println!("smart alert {alert_id} disabled");
        return Ok(());
    }

    let payload = if let Some(path) = &args.from_file {
        let text = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        value.to_string()
    } else {
        let fetched = alerts::get_alert(&client, alert_id)?;
        let Some(current) = fetched.into_iter().next() else {
            return Err(ClientError::NotFound(format!("alert {alert_id}")).into());
        };
        let mut updater = AlertUpdater::new(current)?;
        if let Some(name) = &args.name {
            updater.update_name(name)?;
        }
        if let Some(description) = &args.description {
            updater.update_description(description);
        }
        if let Some(severity) = &args.severity {
            updater.update_severity(severity)?;
        }
        if !args.test.is_empty() {
            updater.update_tests(&args.test)?;
        }
        if !args.alert_channel.is_empty() {
            updater.update_alert_channels(&args.alert_channel)?;
        }
        if let Some(count) = args.violation_count {
            updater.update_violations_count(count)?;
        }
        if let Some(expression) = &args.tag_filter_expression {
            updater.update_tag_filter_expression(Some(serde_json::from_str(expression)?))?;
        }
        updater.to_json()
    };

    alerts::update_alert(&client, alert_id, payload)?;
    println!("smart alert {alert_id} updated");
    Ok(())
}

fn update_credential(args: &UpdateArgs) -> Result<()> {
    let Some(value) = &args.value else {
        return Err(ClientError::InvalidArgument(
            "--value is required to update a credential".into(),
        )
        .into());
    };
    let client = commands::api_client(&args.auth)?;

    let mut builder = CredentialConfigBuilder::new();
    builder.set_credential_name(&args.id);
    builder.set_credential_value(value);
    builder.set_applications(&args.apps);
    builder.set_websites(&args.websites);
    builder.set_mobile_apps(&args.mobile_apps);
    credentials::update_credential(&client, &args.id, builder.to_json()?)?;
    println!("credential \"{}\" updated", args.id);
    Ok(())
}
