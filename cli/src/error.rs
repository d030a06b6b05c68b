//! CLI-level errors (wraps API client errors)

use gradient_core::ApiError;
use thiserror::Error;

use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("configuration: {0}")]
    Config(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<config::ConfigError> for CliError {
    fn from(e: config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => exitcode::CONFIG,
            CliError::Api(e) => match e {
                ApiError::Api { .. } => exitcode::API_ERROR,
                ApiError::Unknown { .. } => exitcode::PROTOCOL,
                ApiError::MalformedResponse(_) => exitcode::DATAERR,
                ApiError::Transport(_) => exitcode::UNAVAILABLE,
                ApiError::Serialization(_) => exitcode::SOFTWARE,
            },
        }
    }

    /// True when the server answered with an error meant for the user.
    /// Those go to stdout as plain text; everything else is reported on
    /// stderr.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(
            self,
            CliError::Api(ApiError::Api { .. } | ApiError::Unknown { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradient_core::Operation;
    use rstest::rstest;

    #[rstest]
    #[case(CliError::Config("bad".into()), exitcode::CONFIG, false)]
    #[case(
        CliError::Api(ApiError::Api { status: 403, message: "Forbidden".into(), detail: None }),
        exitcode::API_ERROR,
        true
    )]
    #[case(
        CliError::Api(ApiError::Unknown { status: 500, operation: Operation::CreateHyperparameter }),
        exitcode::PROTOCOL,
        true
    )]
    #[case(CliError::Api(ApiError::MalformedResponse("x".into())), exitcode::DATAERR, false)]
    #[case(CliError::Api(ApiError::Transport("refused".into())), exitcode::UNAVAILABLE, false)]
    #[case(CliError::Api(ApiError::Serialization("x".into())), exitcode::SOFTWARE, false)]
    fn exit_codes(#[case] err: CliError, #[case] code: i32, #[case] remote: bool) {
        assert_eq!(err.exit_code(), code);
        assert_eq!(err.is_remote_rejection(), remote);
    }
}
