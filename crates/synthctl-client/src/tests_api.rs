//! Synthetic test endpoints under `/api/synthetics/settings/tests/`.
//!
//! Creation posts a finalized builder payload and reports the assigned id;
//! retrieval always hands back a list so single-test and all-test reads
//! share one shape. Batch deletes run item by item and report a
//! [`DeleteOutcome`] per id; only rate limiting aborts the batch.

use crate::error::ClientError;
use crate::http::{status_error, ApiClient, DeleteOutcome};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

const TESTS_PATH: &str = "/api/synthetics/settings/tests/";

/// Identity assigned by the backend on creation.
#[derive(Debug, Clone)]
pub struct CreatedTest {
    pub id: String,
    pub label: String,
}

/// A test selected for deletion by one of the match helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedTest {
    pub id: String,
    pub label: String,
}

pub fn create_test(client: &ApiClient, payload: String) -> Result<CreatedTest, ClientError> {
    let response = client.post_raw(TESTS_PATH, payload)?;
    if response.status != 201 {
        return Err(status_error(&response, "create test", "test"));
    }
    let data = response.json()?;
    let created = CreatedTest {
        id: data["id"].as_str().unwrap_or_default().to_string(),
        label: data["label"].as_str().unwrap_or_default().to_string(),
    };
    info!(id = %created.id, label = %created.label, "test created");
    Ok(created)
}

/// Fetch one test by id. The backend may answer with a single object or a
/// list; both come back as a list.
pub fn get_test(client: &ApiClient, test_id: &str) -> Result<Vec<Value>, ClientError> {
    if test_id.is_empty() {
        return Err(ClientError::InvalidArgument(
            "test id should not be empty".into(),
        ));
    }
    let response = client.get(&format!("{TESTS_PATH}{test_id}"))?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "get test",
            &format!("test {test_id}"),
        ));
    }
    match response.json()? {
        Value::Array(tests) => Ok(tests),
        single @ Value::Object(_) => Ok(vec![single]),
        other => Err(ClientError::InvalidArgument(format!(
            "unknown data: {other}"
        ))),
    }
}

/// Fetch all tests, optionally keeping only one synthetic type (wire name,
/// e.g. `HTTPAction`).
pub fn list_tests(client: &ApiClient, syn_type: Option<&str>) -> Result<Vec<Value>, ClientError> {
    let response = client.get(TESTS_PATH)?;
    if response.status != 200 {
        return Err(status_error(&response, "get tests", "tests"));
    }
    let all = match response.json()? {
        Value::Array(tests) => tests,
        single @ Value::Object(_) => vec![single],
        other => {
            return Err(ClientError::InvalidArgument(format!(
                "unknown data: {other}"
            )))
        }
    };
    let filtered = match syn_type {
        None => all,
        Some(wanted) => all
            .into_iter()
            .filter(|t| t["configuration"]["syntheticType"] == wanted)
            .collect(),
    };
    Ok(filtered)
}

/// Fetch tests filtered server-side by location or application id. The
/// filter key is matched case-insensitively against the two supported
/// names.
pub fn list_tests_by_filter(
    client: &ApiClient,
    filter_key: &str,
    filter_value: &str,
) -> Result<Vec<Value>, ClientError> {
    let key = normalize_filter_key(filter_key)?;
    let response = client.get(&format!(
        "/api/synthetics/settings/tests?{key}={filter_value}"
    ))?;
    if response.status != 200 {
        return Err(status_error(&response, "get tests", "tests"));
    }
    match response.json()? {
        Value::Array(tests) => Ok(tests),
        single @ Value::Object(_) => Ok(vec![single]),
        other => Err(ClientError::InvalidArgument(format!(
            "unknown data: {other}"
        ))),
    }
}

fn normalize_filter_key(filter_key: &str) -> Result<&'static str, ClientError> {
    match filter_key.to_lowercase().as_str() {
        "locationid" => Ok("locationId"),
        "applicationid" => Ok("applicationId"),
        _ => Err(ClientError::InvalidFilter(filter_key.to_string())),
    }
}

/// Replace a test wholesale with an updated payload.
pub fn update_test(client: &ApiClient, test_id: &str, payload: String) -> Result<(), ClientError> {
    let response = client.put_raw(&format!("{TESTS_PATH}{test_id}"), payload)?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "update test",
            &format!("test {test_id}"),
        ));
    }
    info!(id = test_id, "test updated");
    Ok(())
}

/// Patch a single field of a test. `payload` carries only the changed
/// field, nested under `configuration` when the field lives there.
pub fn patch_test(client: &ApiClient, test_id: &str, payload: &Value) -> Result<(), ClientError> {
    let response = client.patch_json(&format!("{TESTS_PATH}{test_id}"), payload)?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "patch test",
            &format!("test {test_id}"),
        ));
    }
    info!(id = test_id, "test patched");
    Ok(())
}

pub fn delete_test(client: &ApiClient, test_id: &str) -> Result<DeleteOutcome, ClientError> {
    if test_id.is_empty() {
        return Err(ClientError::InvalidArgument(
            "test id should not be empty".into(),
        ));
    }
    let response = client.delete(&format!("{TESTS_PATH}{test_id}"))?;
    match response.status {
        204 => Ok(DeleteOutcome::Deleted),
        404 => Ok(DeleteOutcome::NotFound),
        429 => Err(ClientError::TooManyRequests),
        status => Ok(DeleteOutcome::Failed(status)),
    }
}

/// Delete a batch of tests one by one. Returns the per-id outcomes in
/// input order; rate limiting aborts the remainder of the batch.
pub fn delete_tests(
    client: &ApiClient,
    test_ids: &[String],
) -> Result<Vec<(String, DeleteOutcome)>, ClientError> {
    let mut outcomes = Vec::with_capacity(test_ids.len());
    for test_id in test_ids {
        let outcome = delete_test(client, test_id)?;
        debug!(id = %test_id, ?outcome, "delete");
        outcomes.push((test_id.clone(), outcome));
    }
    Ok(outcomes)
}

/// Select tests whose label matches `pattern` anchored at the start of
/// the label.
pub fn match_tests_by_label(
    tests: &[Value],
    pattern: &str,
) -> Result<Vec<MatchedTest>, ClientError> {
    let regex = Regex::new(pattern)
        .map_err(|err| ClientError::InvalidArgument(format!("invalid regex: {err}")))?;
    let matched = tests
        .iter()
        .filter_map(|test| {
            let label = test["label"].as_str()?;
            let hit = regex.find(label)?;
            (hit.start() == 0).then(|| MatchedTest {
                id: test["id"].as_str().unwrap_or_default().to_string(),
                label: label.to_string(),
            })
        })
        .collect();
    Ok(matched)
}

/// Select tests whose only location is `location_id`. Tests deployed to
/// additional locations are left alone.
pub fn match_tests_by_location(tests: &[Value], location_id: &str) -> Vec<MatchedTest> {
    tests
        .iter()
        .filter_map(|test| {
            let locations = test["locations"].as_array()?;
            (locations.len() == 1 && locations[0] == location_id).then(|| MatchedTest {
                id: test["id"].as_str().unwrap_or_default().to_string(),
                label: test["label"].as_str().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Select tests deployed to no location at all.
pub fn match_tests_without_location(tests: &[Value]) -> Vec<MatchedTest> {
    tests
        .iter()
        .filter_map(|test| {
            let locations = test["locations"].as_array()?;
            locations.is_empty().then(|| MatchedTest {
                id: test["id"].as_str().unwrap_or_default().to_string(),
                label: test["label"].as_str().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_fixture(id: &str, label: &str, locations: Vec<&str>) -> Value {
        json!({
            "id": id,
            "label": label,
            "locations": locations,
            "configuration": {"syntheticType": "HTTPAction"},
        })
    }

    #[test]
    fn filter_key_is_case_insensitive() {
        assert_eq!(normalize_filter_key("LOCATIONID").unwrap(), "locationId");
        assert_eq!(
            normalize_filter_key("applicationId").unwrap(),
            "applicationId"
        );
        assert!(matches!(
            normalize_filter_key("tagId"),
            Err(ClientError::InvalidFilter(key)) if key == "tagId"
        ));
    }

    #[test]
    fn label_regex_matches_anchored_at_start() {
        let tests = vec![
            test_fixture("1", "ping-payments", vec!["loc-a"]),
            test_fixture("2", "nightly-ping", vec!["loc-a"]),
            test_fixture("3", "ping-search", vec!["loc-b"]),
        ];
        let matched = match_tests_by_label(&tests, "ping-").unwrap();
        let ids: Vec<&str> = matched.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn invalid_label_regex_is_rejected() {
        let tests = vec![test_fixture("1", "ping", vec![])];
        assert!(match_tests_by_label(&tests, "ping[").is_err());
    }

    #[test]
    fn location_match_requires_single_location() {
        let tests = vec![
            test_fixture("1", "only-a", vec!["loc-a"]),
            test_fixture("2", "a-and-b", vec!["loc-a", "loc-b"]),
            test_fixture("3", "only-b", vec!["loc-b"]),
        ];
        let matched = match_tests_by_location(&tests, "loc-a");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "1");
    }

    #[test]
    fn without_location_selects_undeployed_tests() {
        let tests = vec![
            test_fixture("1", "deployed", vec!["loc-a"]),
            test_fixture("2", "orphan", vec![]),
        ];
        let matched = match_tests_without_location(&tests);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].label, "orphan");
    }
}
