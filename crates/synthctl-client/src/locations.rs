//! Managed location endpoints under `/api/synthetics/settings/locations`.

use crate::error::ClientError;
use crate::http::{status_error, ApiClient, DeleteOutcome};
use crate::pagination::{aggregate_list, Page};
use serde_json::{json, Value};

const LOCATIONS_PATH: &str = "/api/synthetics/settings/locations";
const LOCATION_SUMMARY_PATH: &str = "/api/synthetics/results/locationsummarylist";

const DEFAULT_PAGE_SIZE: u64 = 200;

pub fn list_locations(client: &ApiClient) -> Result<Vec<Value>, ClientError> {
    let response = client.get(LOCATIONS_PATH)?;
    if response.status != 200 {
        return Err(status_error(&response, "get locations", "locations"));
    }
    match response.json()? {
        Value::Array(locations) => Ok(locations),
        single @ Value::Object(_) => Ok(vec![single]),
        other => Err(ClientError::InvalidArgument(format!(
            "unknown data: {other}"
        ))),
    }
}

pub fn get_location(client: &ApiClient, location_id: &str) -> Result<Value, ClientError> {
    if location_id.is_empty() {
        return Err(ClientError::InvalidArgument(
            "location id should not be empty".into(),
        ));
    }
    let response = client.get(&format!("{LOCATIONS_PATH}/{location_id}"))?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "get location",
            &format!("location {location_id}"),
        ));
    }
    response.json()
}

pub fn delete_location(
    client: &ApiClient,
    location_id: &str,
) -> Result<DeleteOutcome, ClientError> {
    if location_id.is_empty() {
        return Err(ClientError::InvalidArgument(
            "location id should not be empty".into(),
        ));
    }
    let response = client.delete(&format!("{LOCATIONS_PATH}/{location_id}"))?;
    match response.status {
        204 => Ok(DeleteOutcome::Deleted),
        404 => Ok(DeleteOutcome::NotFound),
        429 => Err(ClientError::TooManyRequests),
        status => Ok(DeleteOutcome::Failed(status)),
    }
}

/// Delete a batch of locations, reporting per-id outcomes in order.
pub fn delete_locations(
    client: &ApiClient,
    location_ids: &[String],
) -> Result<Vec<(String, DeleteOutcome)>, ClientError> {
    let mut outcomes = Vec::with_capacity(location_ids.len());
    for location_id in location_ids {
        outcomes.push((location_id.clone(), delete_location(client, location_id)?));
    }
    Ok(outcomes)
}

fn summary_body(page: u64, page_size: u64, window_ms: u64) -> Value {
    json!({
        "pagination": {"page": page, "pageSize": page_size},
        "timeFrame": {"to": 0, "windowSize": window_ms}
    })
}

fn fetch_summary_page(
    client: &ApiClient,
    page: u64,
    window_ms: u64,
) -> Result<Page, ClientError> {
    let body = summary_body(page, DEFAULT_PAGE_SIZE, window_ms);
    let response = client.post_json(LOCATION_SUMMARY_PATH, &body)?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "retrieve location summary list",
            "location summary",
        ));
    }
    Ok(Page::from_value(&response.json()?))
}

/// Fetch the per-location usage summary across all pages.
pub fn get_location_summary(
    client: &ApiClient,
    window_ms: u64,
) -> Result<Vec<Value>, ClientError> {
    let first = fetch_summary_page(client, 1, window_ms)?;
    aggregate_list(first, |page| fetch_summary_page(client, page, window_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_body_carries_window_and_pagination() {
        let body = summary_body(3, 200, 3_600_000);
        assert_eq!(body["pagination"]["page"], 3);
        assert_eq!(body["pagination"]["pageSize"], 200);
        assert_eq!(body["timeFrame"]["to"], 0);
        assert_eq!(body["timeFrame"]["windowSize"], 3_600_000);
    }
}
