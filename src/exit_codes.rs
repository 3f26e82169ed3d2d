//! Exit code mapping.
//!
//! Library crates never call `process::exit`; every failure surfaces as a
//! typed error and is mapped to an exit code here. Argument and
//! validation mistakes exit 2, everything else (transport, backend
//! statuses) exits 1.

use synthctl_client::ClientError;
use synthctl_config::ProfileError;
use synthctl_model::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    pub fn as_i32(self) -> i32 {
        self.0
    }
}

/// Classify an error chain into an exit code.
pub fn for_error(error: &anyhow::Error) -> ExitCode {
    if let Some(model) = error.downcast_ref::<ModelError>() {
        return match model {
            ModelError::Json(_) | ModelError::FileRead { .. } => ExitCode::FAILURE,
            _ => ExitCode::CLI_ARGS,
        };
    }
    if let Some(client) = error.downcast_ref::<ClientError>() {
        return match client {
            ClientError::InvalidWindowSize(_)
            | ClientError::InvalidFilter(_)
            | ClientError::InvalidArgument(_) => ExitCode::CLI_ARGS,
            _ => ExitCode::FAILURE,
        };
    }
    if let Some(profile) = error.downcast_ref::<ProfileError>() {
        return match profile {
            ProfileError::IncompleteProfile | ProfileError::NoSuchProfile(_) => ExitCode::CLI_ARGS,
            _ => ExitCode::FAILURE,
        };
    }
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_exit_two() {
        let err = anyhow::Error::new(ModelError::RetryOutOfRange);
        assert_eq!(for_error(&err), ExitCode::CLI_ARGS);

        let err = anyhow::Error::new(ClientError::InvalidWindowSize("2d".into()));
        assert_eq!(for_error(&err), ExitCode::CLI_ARGS);
    }

    #[test]
    fn backend_errors_exit_one() {
        let err = anyhow::Error::new(ClientError::TooManyRequests);
        assert_eq!(for_error(&err), ExitCode::FAILURE);

        let err = anyhow::Error::new(ClientError::NotFound("test abc".into()));
        assert_eq!(for_error(&err), ExitCode::FAILURE);
    }

    #[test]
    fn unknown_errors_exit_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(for_error(&err), ExitCode::FAILURE);
    }
}
