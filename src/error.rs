//! Error types and exit codes for stubscan
//!
//! Two tiers of errors exist:
//! - [`StubscanError`] is fatal: it aborts the run and maps to a non-zero exit code.
//! - [`RecoverableError`] and [`LiveError`] are per-item: callers log them and
//!   degrade the affected field to absent/unchanged.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Fatal error type for stubscan operations
#[derive(Error, Debug)]
pub enum StubscanError {
    #[error("Invalid JSON in {context}: {message}")]
    InvalidJson { context: String, message: String },

    #[error("Cannot read version manifest {}: {message}", .path.display())]
    ManifestUnreadable { path: PathBuf, message: String },

    #[error("Stub source tree unavailable: {message}")]
    StubSourceUnavailable { message: String },

    #[error("Failed to parse {}: {message}", .path.display())]
    ParseFailure { path: PathBuf, message: String },

    #[error("Git error: {message}")]
    GitError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Cannot start live environment: {message}")]
    BridgeError { message: String },

    #[error("I/O error at {}: {message}", .path.display())]
    IoError { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StubscanError {
    /// Convert error to an exit code:
    /// - 0: Success
    /// - 1: IO error
    /// - 2: Malformed JSON input or manifest
    /// - 3: Parse failure of a required stub file
    /// - 4: Stub source tree unavailable / git failure
    /// - 5: Configuration error
    /// - 6: Live interpreter could not be started
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidJson { .. } => ExitCode::from(2),
            Self::ManifestUnreadable { .. } => ExitCode::from(2),
            Self::ParseFailure { .. } => ExitCode::from(3),
            Self::StubSourceUnavailable { .. } => ExitCode::from(4),
            Self::GitError { .. } => ExitCode::from(4),
            Self::ConfigError { .. } => ExitCode::from(5),
            Self::BridgeError { .. } => ExitCode::from(6),
            Self::IoError { .. } => ExitCode::from(1),
            Self::Io(_) => ExitCode::from(1),
        }
    }
}

/// Result type alias for fatal stubscan operations
pub type Result<T> = std::result::Result<T, StubscanError>;

/// Per-item failure during static extraction.
///
/// Never propagated past the declaration or parameter that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoverableError {
    #[error("cannot render annotation `{text}`: {reason}")]
    Annotation { text: String, reason: String },

    #[error("cannot render default value `{text}`: {reason}")]
    DefaultValue { text: String, reason: String },

    #[error("cannot decode docstring: {reason}")]
    Docstring { reason: String },

    #[error("unsupported parameter syntax `{text}`")]
    Parameter { text: String },
}

/// Per-item failure while querying the live environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiveError {
    #[error("module `{module}` cannot be imported: {message}")]
    ModuleNotFound { module: String, message: String },

    #[error("symbol `{path}` not found")]
    SymbolNotFound { path: String },

    #[error("no documentation for `{path}`")]
    NoDocumentation { path: String },

    #[error("introspection of `{path}` failed: {message}")]
    Introspection { path: String, message: String },

    #[error("live environment unavailable: {message}")]
    Bridge { message: String },
}
