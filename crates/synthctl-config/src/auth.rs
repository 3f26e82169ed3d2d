//! Auth resolution.
//!
//! Precedence: the `SYN_SERVER_HOSTNAME` / `SYN_API_TOKEN` pair when both
//! are set, then the profile named by `--use-env`, then the default
//! profile. A half-set environment pair is ignored.

use crate::error::ProfileError;
use crate::store::ProfileStore;
use tracing::debug;

pub const HOST_VAR: &str = "SYN_SERVER_HOSTNAME";
pub const TOKEN_VAR: &str = "SYN_API_TOKEN";

/// A resolved backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth {
    pub host: String,
    pub token: String,
}

fn env_auth() -> Option<Auth> {
    match (std::env::var(HOST_VAR), std::env::var(TOKEN_VAR)) {
        (Ok(host), Ok(token)) => Some(Auth {
            host: host.trim_end_matches('/').to_string(),
            token,
        }),
        _ => None,
    }
}

/// Resolve the endpoint for a command, preferring the environment pair.
pub fn resolve_auth(store: &ProfileStore, profile: Option<&str>) -> Result<Auth, ProfileError> {
    resolve_with(env_auth(), store, profile)
}

fn resolve_with(
    env: Option<Auth>,
    store: &ProfileStore,
    profile: Option<&str>,
) -> Result<Auth, ProfileError> {
    if let Some(auth) = env {
        debug!("auth resolved from environment");
        return Ok(auth);
    }
    let profile = match profile {
        Some(name) => store.profile_by_name(name)?,
        None => store.default_profile()?,
    };
    debug!(profile = %profile.name, "auth resolved from profile store");
    Ok(Auth {
        host: profile.host.trim_end_matches('/').to_string(),
        token: profile.token.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_profiles(dir: &TempDir) -> ProfileStore {
        let mut store = ProfileStore::open_at(dir.path().join("config.json")).unwrap();
        store.add("prod", "https://prod", "tp", false).unwrap();
        store.add("stage", "https://stage", "ts", false).unwrap();
        store
    }

    #[test]
    fn environment_pair_wins_over_profiles() {
        let dir = TempDir::new().unwrap();
        let store = store_with_profiles(&dir);
        let env = Some(Auth {
            host: "https://env".into(),
            token: "te".into(),
        });
        let auth = resolve_with(env, &store, Some("stage")).unwrap();
        assert_eq!(auth.host, "https://env");
    }

    #[test]
    fn named_profile_beats_default() {
        let dir = TempDir::new().unwrap();
        let store = store_with_profiles(&dir);
        let auth = resolve_with(None, &store, Some("stage")).unwrap();
        assert_eq!(auth.host, "https://stage");
        assert_eq!(auth.token, "ts");
    }

    #[test]
    fn default_profile_is_the_fallback() {
        let dir = TempDir::new().unwrap();
        let store = store_with_profiles(&dir);
        let auth = resolve_with(None, &store, None).unwrap();
        assert_eq!(auth.host, "https://prod");
    }

    #[test]
    fn unknown_profile_name_errors() {
        let dir = TempDir::new().unwrap();
        let store = store_with_profiles(&dir);
        assert!(matches!(
            resolve_with(None, &store, Some("qa")),
            Err(ProfileError::NoSuchProfile(name)) if name == "qa"
        ));
    }
}
