//! Credential endpoints under `/api/synthetics/settings/credentials/`.
//!
//! The plain listing returns bare credential names; the `associations`
//! listing returns full objects including the applications, websites and
//! mobile apps a credential is scoped to. There is no server-side update:
//! updating a credential deletes it and recreates it with the new payload.

use crate::error::ClientError;
use crate::http::{status_error, ApiClient, DeleteOutcome};
use serde_json::{json, Value};
use tracing::info;

const CREDENTIALS_PATH: &str = "/api/synthetics/settings/credentials/";
const ASSOCIATIONS_PATH: &str = "/api/synthetics/settings/credentials/associations";

pub fn create_credential(client: &ApiClient, payload: String) -> Result<(), ClientError> {
    let response = client.post_raw(CREDENTIALS_PATH, payload)?;
    if response.status != 201 {
        return Err(status_error(&response, "create credential", "credential"));
    }
    info!("credential created");
    Ok(())
}

/// List the names of all credentials.
pub fn list_credential_names(client: &ApiClient) -> Result<Vec<String>, ClientError> {
    let response = client.get(CREDENTIALS_PATH)?;
    if response.status != 200 {
        return Err(status_error(&response, "get credentials", "credentials"));
    }
    let names = match response.json()? {
        Value::Array(names) => names
            .into_iter()
            .filter_map(|name| name.as_str().map(str::to_string))
            .collect(),
        other => {
            return Err(ClientError::InvalidArgument(format!(
                "unknown data: {other}"
            )))
        }
    };
    Ok(names)
}

/// List all credentials with their association details.
pub fn list_credentials_detailed(client: &ApiClient) -> Result<Vec<Value>, ClientError> {
    let response = client.get(ASSOCIATIONS_PATH)?;
    if response.status != 200 {
        return Err(status_error(&response, "get credentials", "credentials"));
    }
    match response.json()? {
        Value::Array(credentials) => Ok(credentials),
        single @ Value::Object(_) => Ok(vec![single]),
        other => Err(ClientError::InvalidArgument(format!(
            "unknown data: {other}"
        ))),
    }
}

/// Fetch one credential with its associations.
pub fn get_credential(client: &ApiClient, name: &str) -> Result<Value, ClientError> {
    if name.is_empty() {
        return Err(ClientError::InvalidArgument(
            "credential should not be empty".into(),
        ));
    }
    let response = client.get(&format!("{ASSOCIATIONS_PATH}/{name}"))?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "get credential",
            &format!("credential {name}"),
        ));
    }
    response.json()
}

pub fn delete_credential(client: &ApiClient, name: &str) -> Result<DeleteOutcome, ClientError> {
    if name.is_empty() {
        return Err(ClientError::InvalidArgument(
            "credential should not be empty".into(),
        ));
    }
    let response = client.delete(&format!("{CREDENTIALS_PATH}{name}"))?;
    match response.status {
        204 => Ok(DeleteOutcome::Deleted),
        404 => Ok(DeleteOutcome::NotFound),
        429 => Err(ClientError::TooManyRequests),
        status => Ok(DeleteOutcome::Failed(status)),
    }
}

/// Delete a batch of credentials, reporting per-name outcomes in order.
pub fn delete_credentials(
    client: &ApiClient,
    names: &[String],
) -> Result<Vec<(String, DeleteOutcome)>, ClientError> {
    let mut outcomes = Vec::with_capacity(names.len());
    for name in names {
        outcomes.push((name.clone(), delete_credential(client, name)?));
    }
    Ok(outcomes)
}

/// Replace a credential by deleting and recreating it.
///
/// The delete must succeed before the recreate is attempted; a credential
/// that never existed is reported as not found.
pub fn update_credential(
    client: &ApiClient,
    name: &str,
    payload: String,
) -> Result<(), ClientError> {
    match delete_credential(client, name)? {
        DeleteOutcome::Deleted => {}
        DeleteOutcome::NotFound => {
            return Err(ClientError::NotFound(format!("credential {name}")))
        }
        DeleteOutcome::Failed(status) => {
            return Err(ClientError::UnexpectedStatus {
                operation: format!("delete credential {name}"),
                status,
                body: String::new(),
            })
        }
    }
    create_credential(client, payload)?;
    info!(name, "credential updated");
    Ok(())
}

fn patch_associations(client: &ApiClient, name: &str, body: &Value) -> Result<(), ClientError> {
    if name.is_empty() {
        return Err(ClientError::InvalidArgument(
            "credential should not be empty".into(),
        ));
    }
    let response = client.patch_json(&format!("{ASSOCIATIONS_PATH}/{name}"), body)?;
    if response.status != 200 {
        return Err(status_error(
            &response,
            "patch credential",
            &format!("credential {name}"),
        ));
    }
    info!(name, "credential associations updated");
    Ok(())
}

pub fn patch_applications(
    client: &ApiClient,
    name: &str,
    applications: &[String],
) -> Result<(), ClientError> {
    patch_associations(client, name, &json!({"applications": applications}))
}

pub fn patch_websites(
    client: &ApiClient,
    name: &str,
    websites: &[String],
) -> Result<(), ClientError> {
    patch_associations(client, name, &json!({"websites": websites}))
}

pub fn patch_mobile_apps(
    client: &ApiClient,
    name: &str,
    mobile_apps: &[String],
) -> Result<(), ClientError> {
    patch_associations(client, name, &json!({"mobileApps": mobile_apps}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_credential_name_is_rejected_before_any_request() {
        let client = ApiClient::new("https://unit.example.com", "token", true).unwrap();
        assert!(matches!(
            get_credential(&client, ""),
            Err(ClientError::InvalidArgument(_))
        ));
        assert!(matches!(
            delete_credential(&client, ""),
            Err(ClientError::InvalidArgument(_))
        ));
    }
}
