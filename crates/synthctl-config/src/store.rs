//! On-disk profile store.
//!
//! The file is created empty (`[]`) on first use. Every mutating
//! operation rewrites the whole file; the store is small and only touched
//! interactively. Hosts are stored with any trailing slash stripped so
//! URL assembly can always append an absolute path.

use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub host: String,
    pub token: String,
    pub default: bool,
}

#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: Vec<Profile>,
}

impl ProfileStore {
    /// Open the store at `~/.synthetic/config.json`, creating the folder
    /// and an empty file on first use.
    pub fn open() -> Result<Self, ProfileError> {
        let home = dirs::home_dir().ok_or(ProfileError::NoHomeDir)?;
        Self::open_at(home.join(".synthetic").join("config.json"))
    }

    pub fn open_at(path: PathBuf) -> Result<Self, ProfileError> {
        if let Some(folder) = path.parent() {
            if !folder.is_dir() {
                fs::create_dir_all(folder).map_err(|source| ProfileError::Io {
                    path: folder.to_path_buf(),
                    source,
                })?;
            }
        }
        if !path.is_file() {
            write_profiles(&path, &[])?;
        }
        let raw = fs::read_to_string(&path).map_err(|source| ProfileError::Io {
            path: path.clone(),
            source,
        })?;
        let profiles: Vec<Profile> = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), count = profiles.len(), "profile store loaded");
        Ok(Self { path, profiles })
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }

    /// Add a profile, or update the existing one with the same name.
    ///
    /// The first profile in a fresh store becomes the default even when
    /// `set_default` is not requested.
    pub fn add(
        &mut self,
        name: &str,
        host: &str,
        token: &str,
        set_default: bool,
    ) -> Result<(), ProfileError> {
        if name.is_empty() || host.is_empty() || token.is_empty() {
            return Err(ProfileError::IncompleteProfile);
        }
        if self.get(name).is_some() {
            return self.update(name, host, token, set_default);
        }
        self.profiles.push(Profile {
            name: name.to_string(),
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
            default: false,
        });
        if set_default {
            self.make_default_unsaved(name);
        } else if self.profiles.len() == 1 {
            self.profiles[0].default = true;
        }
        self.save()
    }

    /// Rewrite the host and token of an existing profile.
    pub fn update(
        &mut self,
        name: &str,
        host: &str,
        token: &str,
        set_default: bool,
    ) -> Result<(), ProfileError> {
        if self.get(name).is_none() {
            return Err(ProfileError::NoSuchProfile(name.to_string()));
        }
        for profile in &mut self.profiles {
            if profile.name == name {
                profile.host = host.trim_end_matches('/').to_string();
                profile.token = token.to_string();
            }
        }
        if set_default {
            self.make_default_unsaved(name);
        }
        self.save()
    }

    /// Remove a profile. Removing the default promotes the first
    /// remaining profile.
    pub fn remove(&mut self, name: &str) -> Result<(), ProfileError> {
        let removed_default = self
            .get(name)
            .ok_or_else(|| ProfileError::NoSuchProfile(name.to_string()))?
            .default;
        self.profiles.retain(|profile| profile.name != name);
        if removed_default {
            if let Some(first) = self.profiles.first_mut() {
                first.default = true;
            }
        }
        self.save()
    }

    /// Flag `name` as the default profile. When no profile carries that
    /// name the first profile becomes the default instead.
    pub fn make_default(&mut self, name: &str) -> Result<(), ProfileError> {
        self.make_default_unsaved(name);
        self.save()
    }

    fn make_default_unsaved(&mut self, name: &str) {
        let mut found = false;
        for profile in &mut self.profiles {
            profile.default = profile.name == name;
            found |= profile.default;
        }
        if !found {
            if let Some(first) = self.profiles.first_mut() {
                first.default = true;
            }
        }
    }

    /// Host and token of the default profile; falls back to the first
    /// profile when none is flagged.
    pub fn default_profile(&self) -> Result<&Profile, ProfileError> {
        self.profiles
            .iter()
            .find(|profile| profile.default)
            .or_else(|| self.profiles.first())
            .ok_or(ProfileError::NoProfiles)
    }

    pub fn profile_by_name(&self, name: &str) -> Result<&Profile, ProfileError> {
        self.get(name)
            .ok_or_else(|| ProfileError::NoSuchProfile(name.to_string()))
    }

    fn save(&self) -> Result<(), ProfileError> {
        write_profiles(&self.path, &self.profiles)
    }
}

fn write_profiles(path: &Path, profiles: &[Profile]) -> Result<(), ProfileError> {
    let body = serde_json::to_string_pretty(profiles)?;
    fs::write(path, body).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> ProfileStore {
        ProfileStore::open_at(dir.path().join("config.json")).unwrap()
    }

    #[test]
    fn first_profile_becomes_default() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store
            .add("prod", "https://prod.example.com/", "token-a", false)
            .unwrap();
        store
            .add("stage", "https://stage.example.com", "token-b", false)
            .unwrap();

        let default = store.default_profile().unwrap();
        assert_eq!(default.name, "prod");
        // Trailing slash is stripped on write.
        assert_eq!(default.host, "https://prod.example.com");
    }

    #[test]
    fn removing_the_default_promotes_the_first_remaining() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add("a", "https://a", "ta", false).unwrap();
        store.add("b", "https://b", "tb", false).unwrap();
        store.add("c", "https://c", "tc", false).unwrap();
        store.remove("a").unwrap();

        assert_eq!(store.default_profile().unwrap().name, "b");
        assert_eq!(store.profiles().len(), 2);
    }

    #[test]
    fn make_default_moves_the_flag() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add("a", "https://a", "ta", false).unwrap();
        store.add("b", "https://b", "tb", false).unwrap();
        store.make_default("b").unwrap();

        assert!(!store.get("a").unwrap().default);
        assert!(store.get("b").unwrap().default);
    }

    #[test]
    fn adding_an_existing_name_updates_in_place() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.add("a", "https://old", "old-token", false).unwrap();
        store.add("a", "https://new/", "new-token", false).unwrap();

        assert_eq!(store.profiles().len(), 1);
        let profile = store.get("a").unwrap();
        assert_eq!(profile.host, "https://new");
        assert_eq!(profile.token, "new-token");
        assert!(profile.default);
    }

    #[test]
    fn store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = open_store(&dir);
            store.add("a", "https://a", "ta", true).unwrap();
        }
        let store = open_store(&dir);
        assert_eq!(store.default_profile().unwrap().name, "a");
    }

    #[test]
    fn incomplete_profiles_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        assert!(matches!(
            store.add("", "https://a", "ta", false),
            Err(ProfileError::IncompleteProfile)
        ));
        assert!(matches!(
            store.add("a", "https://a", "", false),
            Err(ProfileError::IncompleteProfile)
        ));
        assert!(store.profiles().is_empty());
    }

    #[test]
    fn empty_store_has_no_auth() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(matches!(
            store.default_profile(),
            Err(ProfileError::NoProfiles)
        ));
    }
}
