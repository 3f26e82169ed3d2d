use crate::error::ClientError;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Timeout applied to every request. A single attempt is made per call;
/// there is no retry loop at this layer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A raw backend response: status code plus body text.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json(&self) -> Result<Value, ClientError> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Blocking JSON transport for the monitoring backend.
///
/// Authenticates every request with `Authorization: apiToken <token>`.
/// TLS verification is off unless `verify_tls` is set, matching the CLI's
/// `--verify-tls` flag (self-hosted backends commonly run self-signed
/// certificates).
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    host: String,
}

impl ApiClient {
    pub fn new(host: &str, token: &str, verify_tls: bool) -> Result<Self, ClientError> {
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("apiToken {token}"))
            .map_err(|_| ClientError::InvalidArgument("token contains invalid characters".into()))?;
        auth.set_sensitive(true);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!verify_tls)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    fn send(&self, request: RequestBuilder, method: &str, path: &str) -> Result<ApiResponse, ClientError> {
        debug!(method, path, "sending request");
        let response = request.send().map_err(|err| {
            if err.is_timeout() {
                ClientError::Timeout {
                    host: self.host.clone(),
                }
            } else if err.is_connect() {
                ClientError::Connect {
                    host: self.host.clone(),
                    source: err,
                }
            } else {
                ClientError::Transport(err)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(method, path, status, "received response");
        Ok(ApiResponse { status, body })
    }

    pub fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(self.client.get(self.url(path)), "GET", path)
    }

    /// GET returning the raw body bytes (screenshots, videos).
    pub fn get_bytes(&self, path: &str) -> Result<(u16, Vec<u8>), ClientError> {
        let response = self.client.get(self.url(path)).send().map_err(|err| {
            if err.is_timeout() {
                ClientError::Timeout {
                    host: self.host.clone(),
                }
            } else if err.is_connect() {
                ClientError::Connect {
                    host: self.host.clone(),
                    source: err,
                }
            } else {
                ClientError::Transport(err)
            }
        })?;
        let status = response.status().as_u16();
        let bytes = response.bytes()?.to_vec();
        Ok((status, bytes))
    }

    pub fn post_json(&self, path: &str, body: &Value) -> Result<ApiResponse, ClientError> {
        self.send(self.client.post(self.url(path)).json(body), "POST", path)
    }

    /// POST with a pre-serialized payload (finalized builder output).
    pub fn post_raw(&self, path: &str, body: String) -> Result<ApiResponse, ClientError> {
        self.send(self.client.post(self.url(path)).body(body), "POST", path)
    }

    pub fn put_raw(&self, path: &str, body: String) -> Result<ApiResponse, ClientError> {
        self.send(self.client.put(self.url(path)).body(body), "PUT", path)
    }

    pub fn put_empty(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(self.client.put(self.url(path)), "PUT", path)
    }

    pub fn patch_json(&self, path: &str, body: &Value) -> Result<ApiResponse, ClientError> {
        self.send(self.client.patch(self.url(path)).json(body), "PATCH", path)
    }

    pub fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(self.client.delete(self.url(path)), "DELETE", path)
    }
}

/// Outcome of a single delete in a batch. Rate limiting is the only
/// status that aborts a batch; missing and otherwise-failed entries are
/// reported per item so the remaining deletes still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Failed(u16),
}

/// Map a non-success status to the error the caller branches on.
///
/// `resource` names the entity for 404 messages; `operation` labels the
/// fallback error.
pub fn status_error(response: &ApiResponse, operation: &str, resource: &str) -> ClientError {
    match StatusCode::from_u16(response.status) {
        Ok(StatusCode::BAD_REQUEST) => ClientError::BadRequest {
            message: response.body.clone(),
        },
        Ok(StatusCode::FORBIDDEN) => ClientError::Forbidden,
        Ok(StatusCode::NOT_FOUND) => ClientError::NotFound(resource.to_string()),
        Ok(StatusCode::TOO_MANY_REQUESTS) => ClientError::TooManyRequests,
        _ => ClientError::UnexpectedStatus {
            operation: operation.to_string(),
            status: response.status,
            body: response.body.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_trailing_slash_is_stripped() {
        let client = ApiClient::new("https://unit.example.com/", "token", true).unwrap();
        assert_eq!(client.host(), "https://unit.example.com");
        assert_eq!(
            client.url("/api/synthetics/settings/tests/"),
            "https://unit.example.com/api/synthetics/settings/tests/"
        );
    }

    #[test]
    fn empty_body_decodes_to_null() {
        let response = ApiResponse {
            status: 200,
            body: String::new(),
        };
        assert_eq!(response.json().unwrap(), Value::Null);
    }

    #[test]
    fn status_error_classification() {
        let not_found = ApiResponse {
            status: 404,
            body: String::new(),
        };
        assert!(matches!(
            status_error(&not_found, "get test", "test abc"),
            ClientError::NotFound(resource) if resource == "test abc"
        ));

        let rate_limited = ApiResponse {
            status: 429,
            body: String::new(),
        };
        assert!(matches!(
            status_error(&rate_limited, "get test", "test abc"),
            ClientError::TooManyRequests
        ));

        let teapot = ApiResponse {
            status: 418,
            body: "short and stout".into(),
        };
        match status_error(&teapot, "get test", "test abc") {
            ClientError::UnexpectedStatus { status, .. } => assert_eq!(status, 418),
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
