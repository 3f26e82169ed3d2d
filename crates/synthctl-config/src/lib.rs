//! synthctl-config - named backend profiles and auth resolution
//!
//! Profiles live in `~/.synthetic/config.json` as a list of
//! `{name, host, token, default}` entries. Exactly one profile is flagged
//! default; the environment pair `SYN_SERVER_HOSTNAME` / `SYN_API_TOKEN`
//! overrides the store when both are set.

pub mod auth;
pub mod error;
pub mod store;

pub use auth::{resolve_auth, Auth};
pub use error::ProfileError;
pub use store::{Profile, ProfileStore};
