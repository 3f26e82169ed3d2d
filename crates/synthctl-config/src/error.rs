use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("cannot locate home directory")]
    NoHomeDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("name, host, and token must not be empty")]
    IncompleteProfile,

    #[error("no config named \"{0}\"")]
    NoSuchProfile(String),

    #[error("no configurations")]
    NoProfiles,
}
