use thiserror::Error;

/// Errors raised by the configuration builders.
///
/// Only the hard validation failures appear here; permissive fields
/// (frequency, retry interval, followRedirect, HTTP method) fall back to a
/// default or keep the prior value instead of erroring. The split mirrors
/// the backend CLI contract and is deliberate per field, not per class of
/// mistake.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("no location, set --location <location-id> at least a location")]
    EmptyLocations,

    #[error("script cannot be empty")]
    EmptyScript,

    #[error("bundle script cannot be empty")]
    EmptyBundleScript,

    #[error("script content is none")]
    MissingScriptContent,

    #[error("bundle script is none")]
    MissingBundleContent,

    #[error("retry should be [0, 2]")]
    RetryOutOfRange,

    #[error("severity should be warning or critical")]
    InvalidSeverity,

    #[error("violation count should be in [1,12]")]
    ViolationsCountOutOfRange,

    #[error("no credential name, set --key <credential-name>")]
    EmptyCredentialName,

    #[error("no credential value, set --value <credential-value>")]
    EmptyCredentialValue,

    #[error("no synthetic tests, set --test <test-id> at least a synthetic test")]
    EmptySyntheticTests,

    #[error("name should not be empty")]
    EmptyName,

    #[error("no alert channel, set --alert-channel <alert-channel-id> at least an alert channel")]
    EmptyAlertChannels,

    #[error("tag-filter expression should not be none")]
    MissingTagFilterExpression,

    #[error("unknown synthetic type: {0}")]
    UnknownSyntheticType(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}
