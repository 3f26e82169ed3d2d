//! synthctl-model - configuration builders for synthetic monitoring resources
//!
//! This crate holds the payload model of synthctl: the variant-typed test
//! configuration builder, the credential and smart-alert builders, and the
//! field-level updaters applied to payloads fetched back from the server.
//!
//! Documents are built as `serde_json::Value` trees because the backend
//! accepts a schemaless JSON wire format whose field names must match
//! bit-exactly (`syntheticType`, `testFrequency`, `tagFilterExpression`, ...).
//! Builders validate each field on the way in and enforce the document-level
//! invariants when the payload is finalized; they never terminate the
//! process, the CLI decides the exit policy.

pub mod alert;
pub mod bundle;
pub mod credential;
pub mod defaults;
pub mod error;
pub mod merge;
pub mod test_config;
pub mod update;
pub mod variant;

pub use alert::{AlertConfigBuilder, AlertUpdater};
pub use credential::CredentialConfigBuilder;
pub use error::ModelError;
pub use test_config::TestConfigBuilder;
pub use update::TestUpdater;
pub use variant::SyntheticType;
