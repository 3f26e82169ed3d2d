//! `synthctl get` - list and inspect tests, locations, credentials,
//! alerts, alert channels and playback results.

use crate::cli::{GetArgs, GetKind};
use crate::commands;
use crate::output::{fill_space, format_frequency, format_time, value_text};
use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use std::collections::HashMap;
use synthctl_client::{
    alerts, credentials, locations, results, results::SummaryMetrics, tests_api, ApiClient,
    ClientError,
};
use synthctl_model::SyntheticType;

pub fn run(args: &GetArgs) -> Result<()> {
    match args.kind {
        GetKind::Test => get_tests(args),
        GetKind::Location => get_locations(args),
        GetKind::Cred => get_credentials(args),
        GetKind::Alert => get_alerts(args),
        GetKind::AlertChannel => get_alert_channels(args),
        GetKind::Result => get_results(args),
    }
}

fn get_tests(args: &GetArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;

    let tests = match &args.id {
        Some(id) => tests_api::get_test(&client, id)?,
        None => match &args.filter {
            Some(filter) => {
                let (key, value) = filter
                    .split_once('=')
                    .ok_or_else(|| ClientError::InvalidFilter(filter.clone()))?;
                tests_api::list_tests_by_filter(&client, key, value)?
            }
            None => {
                let syn_type = match args.syn_type {
                    Some(index) => Some(SyntheticType::from_index(index)?),
                    None => None,
                };
                tests_api::list_tests(&client, syn_type.map(SyntheticType::as_str))?
            }
        },
    };

    if args.show_json {
        println!("{}", serde_json::to_string_pretty(&tests)?);
        return Ok(());
    }
    if args.show_script || args.save_script {
        for test in &tests {
            if args.show_script {
                print_script(test);
            }
            if args.save_script {
                save_script(test)?;
            }
        }
        return Ok(());
    }
    if args.show_details {
        for test in &tests {
            print_details(test);
        }
        return Ok(());
    }

    let summaries = if args.show_result {
        let window = results::parse_window_size(&args.window_size)?;
        Some(results::get_summary_list(&client, window, None)?)
    } else {
        None
    };
    print_test_table(&tests, summaries.as_ref());
    Ok(())
}

fn print_test_table(tests: &[Value], summaries: Option<&HashMap<String, SummaryMetrics>>) {
    let mut header = format!(
        "{}{}{}{}",
        fill_space("ID", 40),
        fill_space("LABEL", 35),
        fill_space("TYPE", 16),
        fill_space("FREQUENCY", 11)
    );
    if summaries.is_some() {
        header.push_str(&format!(
            "{}{}",
            fill_space("SUCCESS RATE", 14),
            fill_space("RESPONSE TIME", 15)
        ));
    }
    header.push_str("LOCATIONS");
    println!("{header}");

    let no_data = SummaryMetrics::default();
    for test in tests {
        let id = test["id"].as_str().unwrap_or_default();
        let label = test["label"].as_str().unwrap_or_default();
        let syn_type = test["configuration"]["syntheticType"]
            .as_str()
            .unwrap_or_default();
        let frequency = test["testFrequency"].as_i64().unwrap_or_default();
        let mut line = format!(
            "{}{}{}{}",
            fill_space(id, 40),
            fill_space(label, 35),
            fill_space(syn_type, 16),
            fill_space(&format_frequency(frequency), 11)
        );
        if let Some(summaries) = summaries {
            let metrics = summaries.get(id).unwrap_or(&no_data);
            line.push_str(&format!(
                "{}{}",
                fill_space(&metrics.success_rate, 14),
                fill_space(&metrics.response_time, 15)
            ));
        }
        line.push_str(&value_text(&test["locations"]));
        println!("{line}");
    }
}

fn print_script(test: &Value) {
    let conf = &test["configuration"];
    if let Some(script) = conf["script"].as_str() {
        println!("{script}");
    } else if conf.get("scripts").is_some() {
        println!("{}", value_text(&conf["scripts"]));
    } else {
        println!("no script for this test");
    }
}

/// Scripts land next to the working directory as `<label>.js` (or
/// `.side` for Selenium recordings, which are JSON); bundles are decoded
/// back to `<label>.zip`.
fn save_script(test: &Value) -> Result<()> {
    let label = test["label"].as_str().unwrap_or("synthetic-test");
    let conf = &test["configuration"];
    if let Some(script) = conf["script"].as_str() {
        let extension = if serde_json::from_str::<Value>(script).is_ok() {
            "side"
        } else {
            "js"
        };
        let file = format!("{label}.{extension}");
        std::fs::write(&file, script)?;
        println!("script saved to {file}");
    } else if let Some(bundle) = conf["scripts"]["bundle"].as_str() {
        let bytes = STANDARD.decode(bundle)?;
        let file = format!("{label}.zip");
        std::fs::write(&file, bytes)?;
        println!("bundle saved to {file}");
    } else {
        println!("no script for this test");
    }
    Ok(())
}

/// One `key: value` line per top-level field, timestamps humanized.
fn print_details(doc: &Value) {
    let Some(map) = doc.as_object() else {
        println!("{}", value_text(doc));
        return;
    };
    for (key, value) in map {
        let text = match key.as_str() {
            "createdAt" | "modifiedAt" => format_time(value),
            _ => value_text(value),
        };
        println!("{}{}", fill_space(key, 30), text);
    }
    println!();
}

fn get_locations(args: &GetArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;

    if let Some(id) = &args.id {
        let location = locations::get_location(&client, id)?;
        if args.show_json {
            println!("{}", serde_json::to_string_pretty(&location)?);
        } else {
            print_details(&location);
        }
        return Ok(());
    }

    let all = locations::list_locations(&client)?;
    if args.show_json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }
    if args.show_details {
        let window = results::parse_window_size(&args.window_size)?;
        for summary in locations::get_location_summary(&client, window)? {
            print_details(&summary);
        }
        return Ok(());
    }

    println!(
        "{}{}{}{}{}",
        fill_space("ID", 25),
        fill_space("LABEL", 35),
        fill_space("TYPE", 18),
        fill_space("COUNTRY", 18),
        "STATUS"
    );
    for location in &all {
        println!(
            "{}{}{}{}{}",
            fill_space(location["id"].as_str().unwrap_or_default(), 25),
            fill_space(location["displayLabel"].as_str().unwrap_or_default(), 35),
            fill_space(location["locationType"].as_str().unwrap_or_default(), 18),
            fill_space(location["countryName"].as_str().unwrap_or_default(), 18),
            location["status"].as_str().unwrap_or_default()
        );
    }
    Ok(())
}

fn get_credentials(args: &GetArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;

    if let Some(name) = &args.id {
        let credential = credentials::get_credential(&client, name)?;
        if args.show_json {
            println!("{}", serde_json::to_string_pretty(&credential)?);
        } else {
            print_details(&credential);
        }
        return Ok(());
    }

    if args.show_details || args.show_json {
        let detailed = credentials::list_credentials_detailed(&client)?;
        if args.show_json {
            println!("{}", serde_json::to_string_pretty(&detailed)?);
        } else {
            println!(
                "{}{}{}{}",
                fill_space("NAME", 30),
                fill_space("APPLICATIONS", 30),
                fill_space("WEBSITES", 30),
                "MOBILE APPS"
            );
            for credential in &detailed {
                println!(
                    "{}{}{}{}",
                    fill_space(
                        credential["credentialName"].as_str().unwrap_or_default(),
                        30
                    ),
                    fill_space(&value_text(&credential["applications"]), 30),
                    fill_space(&value_text(&credential["websites"]), 30),
                    value_text(&credential["mobileApps"])
                );
            }
        }
        return Ok(());
    }

    let mut names = credentials::list_credential_names(&client)?;
    names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
    for name in &names {
        println!("{name}");
    }
    println!("total: {}", names.len());
    Ok(())
}

fn get_alerts(args: &GetArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;

    let alerts = match &args.id {
        Some(id) => alerts::get_alert(&client, id.trim_start())?,
        None => alerts::list_alerts(&client)?,
    };

    if args.show_json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }
    if args.show_details {
        for alert in &alerts {
            print_details(alert);
        }
        return Ok(());
    }

    println!(
        "{}{}{}{}{}",
        fill_space("ID", 25),
        fill_space("NAME", 40),
        fill_space("SEVERITY", 10),
        fill_space("ENABLED", 9),
        "TESTS"
    );
    for alert in &alerts {
        let tests = alert["syntheticTestIds"]
            .as_array()
            .map(Vec::len)
            .unwrap_or_default();
        println!(
            "{}{}{}{}{}",
            fill_space(alert["id"].as_str().unwrap_or_default(), 25),
            fill_space(alert["name"].as_str().unwrap_or_default(), 40),
            fill_space(&value_text(&alert["severity"]), 10),
            fill_space(&value_text(&alert["enabled"]), 9),
            tests
        );
    }
    Ok(())
}

fn get_alert_channels(args: &GetArgs) -> Result<()> {
    let client = commands::api_client(&args.auth)?;

    if let Some(id) = &args.id {
        let channel = alerts::get_alert_channel(&client, id)?;
        println!("{}", serde_json::to_string_pretty(&channel)?);
        return Ok(());
    }

    let channels = alerts::list_alert_channels(&client)?;
    if args.show_json {
        println!("{}", serde_json::to_string_pretty(&channels)?);
        return Ok(());
    }
    println!("{}{}", fill_space("ID", 40), "NAME");
    for channel in &channels {
        println!(
            "{}{}",
            fill_space(channel["id"].as_str().unwrap_or_default(), 40),
            channel["name"].as_str().unwrap_or_default()
        );
    }
    Ok(())
}

fn get_results(args: &GetArgs) -> Result<()> {
    let Some(test_id) = &args.test else {
        return Err(ClientError::InvalidArgument(
            "--test is required to retrieve results".into(),
        )
        .into());
    };
    let client = commands::api_client(&args.auth)?;

    if let Some(result_id) = &args.id {
        return get_result_details(&client, test_id, result_id, args);
    }

    let window = results::parse_window_size(&args.window_size)?;
    let items = results::get_test_results(&client, test_id, window)?;
    if args.show_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!(
        "{}{}{}{}{}{}",
        fill_space("ID", 40),
        fill_space("START TIME", 25),
        fill_space("LOCATION", 30),
        fill_space("STATUS", 12),
        fill_space("RESPONSE TIME", 15),
        "RESPONSE SIZE"
    );
    // Samples are `[timestamp, value]` pairs; a playback has exactly one.
    for item in &items {
        let properties = &item["testResultCommonProperties"];
        let status = match item["metrics"]["status"][0][1].as_f64() {
            Some(sample) if sample == 1.0 => "Successful",
            Some(_) => "Failed",
            None => "N/A",
        };
        let response_time = item["metrics"]["response_time"][0][1]
            .as_f64()
            .map(crate::output::format_duration_ms)
            .unwrap_or_else(|| "N/A".to_string());
        let response_size = item["metrics"]["response_size"][0][1]
            .as_f64()
            .map(|bytes| format!("{:.2} MiB", bytes / (1024.0 * 1024.0)))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "{}{}{}{}{}{}",
            fill_space(properties["id"].as_str().unwrap_or_default(), 40),
            fill_space(&format_time(&item["metrics"]["response_time"][0][0]), 25),
            fill_space(
                properties["locationDisplayLabel"].as_str().unwrap_or_default(),
                30
            ),
            fill_space(status, 12),
            fill_space(&response_time, 15),
            response_size
        );
    }
    Ok(())
}

fn get_result_details(
    client: &ApiClient,
    test_id: &str,
    result_id: &str,
    args: &GetArgs,
) -> Result<()> {
    let details = results::get_result_details(client, test_id, result_id, args.har)?;
    if let Some(subtransactions) = &details.subtransactions {
        println!("{}", serde_json::to_string_pretty(subtransactions)?);
    }
    if let Some(logs) = &details.logs {
        println!("{}", serde_json::to_string_pretty(logs)?);
    }
    if let Some(har) = &details.har {
        println!("{}", serde_json::to_string_pretty(har)?);
    }

    // Media is only captured by browser playbacks; fetching is opt-in
    // since the payloads can be large.
    if args.show_details {
        let files = results::get_result_files(client, test_id, result_id)?;
        if let Some(images) = files.images {
            let file = format!("{result_id}-images.tar");
            std::fs::write(&file, images)?;
            println!("screenshots saved to {file}");
        }
        if let Some(videos) = files.videos {
            let file = format!("{result_id}.mp4");
            std::fs::write(&file, videos)?;
            println!("video saved to {file}");
        }
    }
    Ok(())
}
