//! Playback result endpoints under `/api/synthetics/results/`.
//!
//! The result listings are POST endpoints taking a metrics query body with
//! a `timeFrame` window and `pagination` block. Window sizes come from the
//! CLI as `<n>m` or `<n>h` and are converted to milliseconds here; days
//! are not accepted because the backend rejects the resulting
//! granularity/windowSize ratio.

use crate::error::ClientError;
use crate::http::{status_error, ApiClient};
use crate::pagination::{aggregate_keyed, aggregate_list, Page};
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

const RESULT_LIST_PATH: &str = "/api/synthetics/results/list";
const TEST_SUMMARY_PATH: &str = "/api/synthetics/results/testsummarylist";

pub const DEFAULT_PAGE_SIZE: u64 = 200;

/// One hour, the default result window.
pub const DEFAULT_WINDOW_MS: u64 = 60 * 60 * 1000;

/// Convert a `<n>m` / `<n>h` window argument to milliseconds.
///
/// Minutes are bounded to [1, 60] and hours to [1, 24]; any other suffix
/// is unsupported.
pub fn parse_window_size(window_size: &str) -> Result<u64, ClientError> {
    let minutes = Regex::new(r"^([1-9][0-9]*)m$").map_err(invalid_pattern)?;
    let hours = Regex::new(r"^([1-9][0-9]*)h$").map_err(invalid_pattern)?;

    if let Some(captures) = minutes.captures(window_size) {
        let n = window_number(&captures[1], window_size)?;
        if !(1..=60).contains(&n) {
            return Err(ClientError::InvalidArgument(
                "minutes should be in [1, 60]".into(),
            ));
        }
        return Ok(n * 60 * 1000);
    }
    if let Some(captures) = hours.captures(window_size) {
        let n = window_number(&captures[1], window_size)?;
        if !(1..=24).contains(&n) {
            return Err(ClientError::InvalidArgument(
                "hours should be in [1, 24]".into(),
            ));
        }
        return Ok(n * 60 * 60 * 1000);
    }
    Err(ClientError::InvalidWindowSize(window_size.to_string()))
}

fn invalid_pattern(err: regex::Error) -> ClientError {
    ClientError::InvalidArgument(format!("invalid window pattern: {err}"))
}

fn window_number(digits: &str, window_size: &str) -> Result<u64, ClientError> {
    digits
        .parse()
        .map_err(|_| ClientError::InvalidWindowSize(window_size.to_string()))
}

fn result_list_body(test_id: &str, page: u64, page_size: u64, window_ms: u64) -> Value {
    json!({
        "syntheticMetrics": [
            "synthetic.metricsResponseTime",
            "synthetic.metricsResponseSize",
            "status",
            "synthetic.errors",
            "custom_metrics"
        ],
        "metrics": [{
            "aggregation": "SUM",
            "granularity": 600,
            "metric": "synthetic.metricsStatus"
        }],
        "order": {
            "by": "synthetic.metricsResponseTime",
            "direction": "DESC"
        },
        "tagFilters": [{
            "stringValue": test_id,
            "name": "synthetic.testId",
            "operator": "EQUALS"
        }],
        "pagination": {"page": page, "pageSize": page_size},
        "timeFrame": {"to": 0, "windowSize": window_ms}
    })
}

fn fetch_result_page(
    client: &ApiClient,
    test_id: &str,
    page: u64,
    window_ms: u64,
) -> Result<Page, ClientError> {
    let body = result_list_body(test_id, page, DEFAULT_PAGE_SIZE, window_ms);
    let response = client.post_json(RESULT_LIST_PATH, &body)?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "retrieve test result list",
            &format!("results for test {test_id}"),
        ));
    }
    Ok(Page::from_value(&response.json()?))
}

/// Fetch every playback result of a test within the window, sorted by
/// response time server-side and concatenated across pages.
pub fn get_test_results(
    client: &ApiClient,
    test_id: &str,
    window_ms: u64,
) -> Result<Vec<Value>, ClientError> {
    if test_id.is_empty() {
        return Err(ClientError::InvalidArgument(
            "test id should not be empty".into(),
        ));
    }
    let first = fetch_result_page(client, test_id, 1, window_ms)?;
    aggregate_list(first, |page| {
        fetch_result_page(client, test_id, page, window_ms)
    })
}

/// Per-test rollup extracted from the summary listing. Both fields print
/// as `N/A` when the window has no data for the metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryMetrics {
    pub success_rate: String,
    pub response_time: String,
}

impl Default for SummaryMetrics {
    fn default() -> Self {
        Self {
            success_rate: "N/A".to_string(),
            response_time: "N/A".to_string(),
        }
    }
}

fn summary_body(test_id: Option<&str>, page: u64, page_size: u64, window_ms: u64) -> Value {
    let mut body = json!({
        "syntheticMetrics": ["synthetic.metricsStatus", "synthetic.metricsResponseTime"],
        "metrics": [{
            "aggregation": "SUM",
            "granularity": 600,
            "metric": "synthetic.metricsStatus"
        }, {
            "aggregation": "MEAN",
            "granularity": 600,
            "metric": "synthetic.metricsResponseTime"
        }],
        "timeFrame": {"to": 0, "windowSize": window_ms},
        "pagination": {"page": page, "pageSize": page_size}
    });
    if let Some(test_id) = test_id.filter(|id| !id.is_empty()) {
        body["tagFilters"] = json!([{
            "stringValue": test_id,
            "name": "synthetic.testId",
            "operator": "EQUALS"
        }]);
    }
    body
}

/// First metric sample of a named series, `metrics.<name>[0][1]`.
fn first_sample(item: &Value, name: &str) -> Option<f64> {
    item["metrics"][name][0][1].as_f64()
}

fn summary_metrics_of(item: &Value) -> SummaryMetrics {
    let mut metrics = SummaryMetrics::default();
    let total = first_sample(item, "total_test_runs");
    let successful = first_sample(item, "successful_test_runs");
    if let (Some(total), Some(successful)) = (total, successful) {
        metrics.success_rate = format!("{successful}/{total}");
    }
    if let Some(response_time) = first_sample(item, "response_time") {
        metrics.response_time = ((response_time * 100.0).round() / 100.0).to_string();
    }
    metrics
}

fn fetch_summary_page(
    client: &ApiClient,
    test_id: Option<&str>,
    page: u64,
    window_ms: u64,
) -> Result<Page, ClientError> {
    let body = summary_body(test_id, page, DEFAULT_PAGE_SIZE, window_ms);
    let response = client.post_json(TEST_SUMMARY_PATH, &body)?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "retrieve test summary list",
            "test summary",
        ));
    }
    Ok(Page::from_value(&response.json()?))
}

/// Fetch the summary rollup for every test in the window (or only
/// `test_id` when given), keyed by test id.
pub fn get_summary_list(
    client: &ApiClient,
    window_ms: u64,
    test_id: Option<&str>,
) -> Result<HashMap<String, SummaryMetrics>, ClientError> {
    let first = fetch_summary_page(client, test_id, 1, window_ms)?;
    let merged = aggregate_keyed(
        first,
        |page| fetch_summary_page(client, test_id, page, window_ms),
        |item| {
            item["testResultCommonProperties"]["testId"]
                .as_str()
                .map(str::to_string)
        },
    )?;
    debug!(tests = merged.len(), "summary list aggregated");
    Ok(merged
        .into_iter()
        .map(|(id, item)| (id, summary_metrics_of(&item)))
        .collect())
}

/// Detail documents attached to one playback result.
#[derive(Debug, Clone, Default)]
pub struct ResultDetails {
    pub subtransactions: Option<Value>,
    pub logs: Option<Value>,
    pub har: Option<Value>,
}

fn detail_url(test_id: &str, result_id: &str, kind: &str) -> String {
    format!("/api/synthetics/results/{test_id}/{result_id}/detail?type={kind}")
}

fn fetch_detail(
    client: &ApiClient,
    test_id: &str,
    result_id: &str,
    kind: &str,
) -> Result<Option<Value>, ClientError> {
    let response = client.get(&detail_url(test_id, result_id, kind))?;
    match response.status {
        200 => Ok(Some(response.json()?)),
        // A result without the detail kind is not an error.
        404 => Ok(None),
        _ => Err(status_error(
            &response,
            "retrieve result details",
            &format!("result {result_id}"),
        )),
    }
}

/// Fetch the subtransaction and log details of a result; the HAR archive
/// is only requested when asked for.
pub fn get_result_details(
    client: &ApiClient,
    test_id: &str,
    result_id: &str,
    with_har: bool,
) -> Result<ResultDetails, ClientError> {
    let mut details = ResultDetails {
        subtransactions: fetch_detail(client, test_id, result_id, "SUBTRANSACTIONS")?,
        logs: fetch_detail(client, test_id, result_id, "LOGS")?,
        har: None,
    };
    if with_har {
        details.har = fetch_detail(client, test_id, result_id, "HAR")?;
    }
    Ok(details)
}

/// Media captured during a browser playback.
#[derive(Debug, Clone, Default)]
pub struct ResultFiles {
    pub images: Option<Vec<u8>>,
    pub videos: Option<Vec<u8>>,
}

fn fetch_file(
    client: &ApiClient,
    test_id: &str,
    result_id: &str,
    kind: &str,
) -> Result<Option<Vec<u8>>, ClientError> {
    let path = format!("/api/synthetics/results/{test_id}/{result_id}/file?type={kind}");
    let (status, bytes) = client.get_bytes(&path)?;
    match status {
        200 => Ok(Some(bytes)),
        404 => Ok(None),
        _ => Err(ClientError::UnexpectedStatus {
            operation: "retrieve result files".to_string(),
            status,
            body: String::new(),
        }),
    }
}

/// Fetch the screenshots and video of a browser result, when present.
pub fn get_result_files(
    client: &ApiClient,
    test_id: &str,
    result_id: &str,
) -> Result<ResultFiles, ClientError> {
    Ok(ResultFiles {
        images: fetch_file(client, test_id, result_id, "IMAGES")?,
        videos: fetch_file(client, test_id, result_id, "VIDEOS")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minutes_and_hours_convert_to_milliseconds() {
        assert_eq!(parse_window_size("30m").unwrap(), 30 * 60 * 1000);
        assert_eq!(parse_window_size("60m").unwrap(), 60 * 60 * 1000);
        assert_eq!(parse_window_size("1h").unwrap(), 60 * 60 * 1000);
        assert_eq!(parse_window_size("24h").unwrap(), 24 * 60 * 60 * 1000);
    }

    #[test]
    fn out_of_range_windows_are_rejected() {
        assert!(matches!(
            parse_window_size("61m"),
            Err(ClientError::InvalidArgument(message)) if message == "minutes should be in [1, 60]"
        ));
        assert!(matches!(
            parse_window_size("25h"),
            Err(ClientError::InvalidArgument(message)) if message == "hours should be in [1, 24]"
        ));
    }

    #[test]
    fn unsupported_window_suffixes_are_rejected() {
        for bad in ["2d", "15", "0m", "m", "1.5h", "-5m"] {
            assert!(
                matches!(parse_window_size(bad), Err(ClientError::InvalidWindowSize(_))),
                "{bad} should be unsupported"
            );
        }
    }

    #[test]
    fn result_list_body_filters_on_test_id() {
        let body = result_list_body("abc", 2, 200, 3_600_000);
        assert_eq!(body["tagFilters"][0]["stringValue"], "abc");
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["timeFrame"]["windowSize"], 3_600_000);
    }

    #[test]
    fn summary_body_omits_tag_filter_without_test_id() {
        let all = summary_body(None, 1, 200, 3_600_000);
        assert!(all.get("tagFilters").is_none());
        let one = summary_body(Some("abc"), 1, 200, 3_600_000);
        assert_eq!(one["tagFilters"][0]["stringValue"], "abc");
    }

    #[test]
    fn summary_metrics_extraction() {
        let item = json!({
            "testResultCommonProperties": {"testId": "abc"},
            "metrics": {
                "total_test_runs": [[0, 12.0]],
                "successful_test_runs": [[0, 11.0]],
                "response_time": [[0, 231.456]]
            }
        });
        let metrics = summary_metrics_of(&item);
        assert_eq!(metrics.success_rate, "11/12");
        assert_eq!(metrics.response_time, "231.46");
    }

    #[test]
    fn summary_metrics_default_to_not_available() {
        let item = json!({
            "testResultCommonProperties": {"testId": "abc"},
            "metrics": {"total_test_runs": [[0, 12.0]]}
        });
        let metrics = summary_metrics_of(&item);
        // Success rate needs both series.
        assert_eq!(metrics.success_rate, "N/A");
        assert_eq!(metrics.response_time, "N/A");
    }
}
