//! CLI-specific error types and exit code mapping

use purlscope_core::error::{ConfigError, PurlscopeError};
use purlscope_evidence::EvidenceError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The evidence engine could not read, parse or write the SBOM.
    #[error("evidence error: {0}")]
    Evidence(#[from] EvidenceError),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from purlscope-core.
    #[error("{0}")]
    Core(PurlscopeError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                       |
    /// |------|-------------------------------|
    /// | 0    | Success                       |
    /// | 1    | General / command error       |
    /// | 2    | Configuration error           |
    /// | 3    | Evidence engine error         |
    /// | 10   | IO error                      |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Evidence(EvidenceError::Config { .. }) => 2,
            Self::Evidence(EvidenceError::SbomRead { .. }) => 10,
            Self::Evidence(_) => 3,
            Self::Io(_) => 10,
            Self::Core(PurlscopeError::Config(_)) => 2,
            Self::Core(PurlscopeError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<PurlscopeError> for CliError {
    fn from(e: PurlscopeError) -> Self {
        match e {
            PurlscopeError::Config(ConfigError::FileNotFound { path }) => {
                Self::Config(format!("config file not found: {path}"))
            }
            other => Self::Core(other),
        }
    }
}
