//! synthctl-client - blocking REST client for the synthetic monitoring backend
//!
//! One CLI invocation performs a sequence of blocking calls with no overlap,
//! so the transport is `reqwest::blocking` with a single bounded-timeout
//! attempt per call; timeouts and connection failures abort the command.
//! Endpoint wrappers interpret the backend status codes (200/201/204 success,
//! 400/403/404/429 and "other" as typed errors) and hand paginated listings
//! to the aggregation helpers in [`pagination`].

pub mod alerts;
pub mod credentials;
pub mod error;
pub mod http;
pub mod locations;
pub mod pagination;
pub mod results;
pub mod tests_api;

pub use error::ClientError;
pub use http::{ApiClient, DeleteOutcome};
pub use pagination::Page;
