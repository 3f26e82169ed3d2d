//! `synthctl create` - create tests, credentials and smart alerts.

use crate::cli::{CreateArgs, CreateKind};
use crate::commands;
use anyhow::Result;
use synthctl_client::{alerts, credentials, tests_api, ClientError};
use synthctl_model::{
    bundle, AlertConfigBuilder, CredentialConfigBuilder, SyntheticType, TestConfigBuilder,
};

pub fn run(args: &CreateArgs) -> Result<()> {
    match args.kind {
        CreateKind::Test => create_test(args),
        CreateKind::Cred => create_credential(args),
        CreateKind::Alert => create_alert(args),
    }
}

fn create_credential(args: &CreateArgs) -> Result<()> {
    let (Some(key), Some(value)) = (&args.key, &args.value) else {
        return Err(ClientError::InvalidArgument(
            "--key and --value are required to create a credential".into(),
        )
        .into());
    };
    let client = commands::api_client(&args.auth)?;

    // The backend answers create-on-existing with an opaque failure, so
    // duplicate names are caught up front with a clearer message.
    let existing = credentials::list_credential_names(&client)?;
    if existing.iter().any(|name| name == key) {
        return Err(
            ClientError::InvalidArgument(format!("credential \"{key}\" already exists")).into(),
        );
    }

    let mut builder = CredentialConfigBuilder::new();
    builder.set_credential_name(key);
    builder.set_credential_value(value);
    builder.set_applications(&args.apps);
    builder.set_websites(&args.websites);
    builder.set_mobile_apps(&args.mobile_apps);
    credentials::create_credential(&client, builder.to_json()?)?;
    println!("credential \"{key}\" created");
    Ok(())
}

fn create_alert(args: &CreateArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;
    let mut builder = AlertConfigBuilder::new();
    if let Some(path) = &args.from_file {
        builder.load_from_json_file(path)?;
    } else {
        if let Some(name) = &args.name {
            builder.set_name(name);
        }
        if let Some(description) = &args.description {
            builder.set_description(description);
        }
        builder.set_synthetic_tests(&args.test);
        builder.set_alert_channels(&args.alert_channel);
        if let Some(severity) = &args.severity {
            builder.set_severity(severity)?;
        }
        if let Some(count) = args.violation_count {
            builder.set_violations_count(count)?;
        }
        if let Some(expression) = &args.tag_filter_expression {
            builder.set_tag_filter_expression(Some(serde_json::from_str(expression)?))?;
        }
    }
    let created = alerts::create_alert(&client, builder.to_json()?)?;
    println!(
        "smart alert \"{}\" created, id is \"{}\"",
        created.name, created.id
    );
    Ok(())
}

fn create_test(args: &CreateArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;

    // A payload file is sent as-is after the document-level checks; the
    // variant used to seed the builder is irrelevant once replaced.
    if let Some(path) = &args.from_file {
        let mut builder = TestConfigBuilder::new(SyntheticType::HttpAction, false);
        builder.load_from_json_file(path)?;
        let created = tests_api::create_test(&client, builder.to_json()?)?;
        println!("test \"{}\" created, id is \"{}\"", created.label, created.id);
        return Ok(());
    }

    let Some(index) = args.syn_type else {
        return Err(
            ClientError::InvalidArgument("--type is required to create a test".into()).into(),
        );
    };
    let syn_type = SyntheticType::from_index(index)?;
    let bundle_mode = args.bundle.is_some();
    let mut builder = TestConfigBuilder::new(syn_type, bundle_mode);

    if let Some(label) = &args.label {
        builder.set_label(label);
    }
    if let Some(description) = &args.description {
        builder.set_description(description);
    }
    builder.set_locations(&args.location);
    builder.set_applications(&args.apps);
    builder.set_websites(&args.websites);
    builder.set_mobile_apps(&args.mobile_apps);
    if let Some(frequency) = args.frequency {
        builder.set_frequency(frequency);
    }
    if let Some(retries) = args.retries {
        builder.set_retries(retries)?;
    }
    builder.set_retry_interval(args.retry_interval);
    if let Some(timeout) = &args.timeout {
        builder.set_timeout(timeout);
    }
    if let Some(properties) = &args.custom_properties {
        builder.set_custom_properties(commands::parse_object(properties)?);
    }

    apply_variant_fields(&mut builder, syn_type, bundle_mode, args)?;

    let created = tests_api::create_test(&client, builder.to_json()?)?;
    println!("test \"{}\" created, id is \"{}\"", created.label, created.id);
    Ok(())
}

fn apply_variant_fields(
    builder: &mut TestConfigBuilder,
    syn_type: SyntheticType,
    bundle_mode: bool,
    args: &CreateArgs,
) -> Result<()> {
    if syn_type.is_action_kind() {
        let Some(url) = &args.url else {
            return Err(ClientError::InvalidArgument(format!(
                "--url is required for {syn_type} tests"
            ))
            .into());
        };
        builder.set_ping_url(url);
    }

    match syn_type {
        SyntheticType::HttpAction => {
            if let Some(operation) = &args.operation {
                builder.set_ping_operation(operation);
            }
            builder.set_follow_redirect(&args.follow_redirect);
            if let Some(headers) = &args.headers {
                builder.set_ping_headers(commands::parse_object(headers)?);
            }
            if let Some(body) = &args.body {
                builder.set_ping_body(body);
            }
            if args.expect_status.is_some() {
                builder.set_expect_status(args.expect_status);
            }
            if let Some(expect_json) = &args.expect_json {
                builder.set_expect_json(commands::parse_object(expect_json)?);
            }
            if let Some(expect_match) = &args.expect_match {
                builder.set_expect_match(expect_match);
            }
            if let Some(expect_exists) = &args.expect_exists {
                builder.set_expect_exists(&commands::parse_string_list(expect_exists)?);
            }
            if let Some(expect_not_empty) = &args.expect_not_empty {
                builder.set_expect_not_empty(&commands::parse_string_list(expect_not_empty)?);
            }
            builder.set_allow_insecure(Some(&args.allow_insecure));
            if let Some(validation_string) = &args.validation_string {
                builder.set_validation_string(validation_string);
            }
        }
        SyntheticType::HttpScript | SyntheticType::BrowserScript | SyntheticType::WebpageScript => {
            apply_script(builder, bundle_mode, args)?;
            if syn_type != SyntheticType::HttpScript {
                apply_browser(builder, args)?;
            }
        }
        SyntheticType::WebpageAction => {
            apply_browser(builder, args)?;
        }
        SyntheticType::SslCertificate => {
            if args.hostname.is_none() {
                return Err(ClientError::InvalidArgument(
                    "--hostname is required for SSLCertificate tests".into(),
                )
                .into());
            }
            builder.set_host(args.hostname.as_deref());
            builder.set_port(args.port);
            builder.set_remaining_days(args.remaining_days_check);
        }
    }
    Ok(())
}

/// `--bundle` takes either a zip file path or already-encoded base64.
fn apply_script(
    builder: &mut TestConfigBuilder,
    bundle_mode: bool,
    args: &CreateArgs,
) -> Result<()> {
    if bundle_mode {
        let bundle_arg = args.bundle.as_deref().unwrap_or_default();
        let content = if bundle::is_zip_file(bundle_arg) {
            bundle::read_zip_file_to_base64(bundle_arg)?
        } else {
            bundle_arg.to_string()
        };
        let entry = args.bundle_entry_file.as_deref().unwrap_or("index.js");
        builder.set_api_bundle_script(Some(&content), entry)?;
    } else {
        let script = match &args.script {
            Some(path) => Some(bundle::read_script_file(path)?),
            None => None,
        };
        builder.set_api_script_script(script.as_deref())?;
    }
    Ok(())
}

fn apply_browser(builder: &mut TestConfigBuilder, args: &CreateArgs) -> Result<()> {
    builder.set_browser_type(&args.browser);
    let record_video = match &args.record_video {
        Some(value) => Some(commands::parse_bool("--record-video", value)?),
        None => None,
    };
    builder.set_record_video(record_video);
    Ok(())
}
