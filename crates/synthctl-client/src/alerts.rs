//! Smart alert endpoints under
//! `/api/events/settings/global-alert-configs/synthetics/`.
//!
//! Unlike test creation the alert create endpoint answers 200, not 201.
//! Enable/disable are empty PUTs to a toggle path on the alert id.

use crate::error::ClientError;
use crate::http::{status_error, ApiClient, DeleteOutcome};
use serde_json::Value;
use tracing::info;

const ALERTS_PATH: &str = "/api/events/settings/global-alert-configs/synthetics/";
const ALERT_CHANNELS_PATH: &str = "/api/events/settings/alertingChannels/";

/// Identity assigned by the backend on creation.
#[derive(Debug, Clone)]
pub struct CreatedAlert {
    pub id: String,
    pub name: String,
}

/// Direction of an alert toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Enable,
    Disable,
}

impl Toggle {
    pub fn as_str(self) -> &'static str {
        match self {
            Toggle::Enable => "enable",
            Toggle::Disable => "disable",
        }
    }
}

pub fn create_alert(client: &ApiClient, payload: String) -> Result<CreatedAlert, ClientError> {
    let response = client.post_raw(ALERTS_PATH, payload)?;
    if response.status != 200 {
        return Err(status_error(&response, "create alert", "alert"));
    }
    let data = response.json()?;
    let created = CreatedAlert {
        id: data["id"].as_str().unwrap_or_default().to_string(),
        name: data["name"].as_str().unwrap_or_default().to_string(),
    };
    info!(id = %created.id, name = %created.name, "smart alert created");
    Ok(created)
}

/// Fetch one smart alert by id, normalized to a list.
pub fn get_alert(client: &ApiClient, alert_id: &str) -> Result<Vec<Value>, ClientError> {
    if alert_id.is_empty() {
        return Err(ClientError::InvalidArgument(
            "alert id should not be empty".into(),
        ));
    }
    let response = client.get(&format!("{ALERTS_PATH}{alert_id}"))?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "get alert",
            &format!("alert {alert_id}"),
        ));
    }
    match response.json()? {
        Value::Array(alerts) => Ok(alerts),
        single @ Value::Object(_) => Ok(vec![single]),
        other => Err(ClientError::InvalidArgument(format!(
            "unknown data: {other}"
        ))),
    }
}

pub fn list_alerts(client: &ApiClient) -> Result<Vec<Value>, ClientError> {
    let response = client.get(ALERTS_PATH)?;
    if response.status != 200 {
        return Err(status_error(&response, "get alerts", "alerts"));
    }
    match response.json()? {
        Value::Array(alerts) => Ok(alerts),
        single @ Value::Object(_) => Ok(vec![single]),
        other => Err(ClientError::InvalidArgument(format!(
            "unknown data: {other}"
        ))),
    }
}

/// Replace a smart alert with an updated payload.
pub fn update_alert(client: &ApiClient, alert_id: &str, payload: String) -> Result<(), ClientError> {
    let response = client.put_raw(&format!("{ALERTS_PATH}{alert_id}"), payload)?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "update alert",
            &format!("alert {alert_id}"),
        ));
    }
    info!(id = alert_id, "smart alert updated");
    Ok(())
}

/// Enable or disable a smart alert in place.
pub fn toggle_alert(client: &ApiClient, alert_id: &str, toggle: Toggle) -> Result<(), ClientError> {
    if alert_id.is_empty() {
        return Err(ClientError::InvalidArgument(
            "alert id should not be empty".into(),
        ));
    }
    let response = client.put_empty(&format!("{ALERTS_PATH}{alert_id}/{}", toggle.as_str()))?;
    if response.status != 204 {
        return Err(status_error(
            &response,
            "toggle alert",
            &format!("alert {alert_id}"),
        ));
    }
    info!(id = alert_id, toggle = toggle.as_str(), "smart alert toggled");
    Ok(())
}

pub fn delete_alert(client: &ApiClient, alert_id: &str) -> Result<DeleteOutcome, ClientError> {
    if alert_id.is_empty() {
        return Err(ClientError::InvalidArgument(
            "alert id should not be empty".into(),
        ));
    }
    let response = client.delete(&format!("{ALERTS_PATH}{alert_id}"))?;
    match response.status {
        204 => Ok(DeleteOutcome::Deleted),
        404 => Ok(DeleteOutcome::NotFound),
        429 => Err(ClientError::TooManyRequests),
        status => Ok(DeleteOutcome::Failed(status)),
    }
}

/// Delete a batch of smart alerts, reporting per-id outcomes in order.
pub fn delete_alerts(
    client: &ApiClient,
    alert_ids: &[String],
) -> Result<Vec<(String, DeleteOutcome)>, ClientError> {
    let mut outcomes = Vec::with_capacity(alert_ids.len());
    for alert_id in alert_ids {
        outcomes.push((alert_id.clone(), delete_alert(client, alert_id)?));
    }
    Ok(outcomes)
}

pub fn list_alert_channels(client: &ApiClient) -> Result<Vec<Value>, ClientError> {
    let response = client.get(ALERT_CHANNELS_PATH)?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "get alert channels",
            "alert channels",
        ));
    }
    match response.json()? {
        Value::Array(channels) => Ok(channels),
        single @ Value::Object(_) => Ok(vec![single]),
        other => Err(ClientError::InvalidArgument(format!(
            "unknown data: {other}"
        ))),
    }
}

pub fn get_alert_channel(client: &ApiClient, channel_id: &str) -> Result<Value, ClientError> {
    let response = client.get(&format!("{ALERT_CHANNELS_PATH}{channel_id}"))?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "get alert channel",
            &format!("alert channel {channel_id}"),
        ));
    }
    response.json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_paths() {
        assert_eq!(Toggle::Enable.as_str(), "enable");
        assert_eq!(Toggle::Disable.as_str(), "disable");
    }

    #[test]
    fn empty_alert_id_is_rejected_before_any_request() {
        let client = ApiClient::new("https://unit.example.com", "token", true).unwrap();
        assert!(matches!(
            get_alert(&client, ""),
            Err(ClientError::InvalidArgument(_))
        ));
        assert!(matches!(
            toggle_alert(&client, "", Toggle::Enable),
            Err(ClientError::InvalidArgument(_))
        ));
    }
}
