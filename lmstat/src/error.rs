//! Error types for license report acquisition and parsing.
//!
//! Every failure is terminal for the invocation: a report is either accurate
//! or not produced.

use std::num::ParseIntError;

use thiserror::Error;

/// The lmstat output could not be turned into a report.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A summary line carried a license count that is not an integer.
    #[error("invalid license count '{value}' in summary line: {line}")]
    InvalidCount {
        value: String,
        line: String,
        #[source]
        source: ParseIntError,
    },

    /// A usage line appeared before any feature and version header.
    #[error("usage line without a preceding feature/version header: {line}")]
    UsageWithoutFeature { line: String },

    /// A usage line refers to a feature/version that was never declared.
    #[error("usage line refers to unknown feature '{key}': {line}")]
    UnknownFeature { key: String, line: String },
}

/// The raw lmstat text could not be obtained.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// The lmutil executable does not exist.
    #[error("'{program}' not found")]
    NotFound { program: String },

    /// The process could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process did not finish in time and was killed.
    #[error("'{program}' timed out after {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },

    /// The process exited with a non-zero status.
    #[error("'{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Reading the process output or an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration file failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Unified error for the whole lminfo pipeline.
#[derive(Debug, Error)]
pub enum LminfoError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Rendering the report failed.
    #[error("output error: {0}")]
    Output(String),
}

/// Convenience alias for results with [`LminfoError`].
pub type Result<T> = std::result::Result<T, LminfoError>;
