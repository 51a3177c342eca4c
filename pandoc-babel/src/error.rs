//! Error types for conversion operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or running a pandoc conversion.
///
/// Every variant aborts the current conversion; nothing is retried and no
/// partial output is returned alongside an error.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The process ran but exited with a nonzero status, or wrote
    /// diagnostics while `fail_on_stderr` is set.
    #[error("pandoc failed ({status}) running `{command}`: {stderr}")]
    Invocation {
        command: String,
        status: ExitStatusCode,
        stderr: String,
    },

    /// The process could not be started at all.
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Inputs were missing or could not be resolved in path mode.
    #[error("Input error: {0}")]
    Input(String),

    /// The temporary output file for a binary writer could not be
    /// created or read back.
    #[error("Temp file error: {detail}")]
    TempFile {
        detail: String,
        #[source]
        source: std::io::Error,
    },

    /// Reader or writer name not present in the format catalog
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// Text writer produced output that is not UTF-8
    #[error("Invalid output: {0}")]
    InvalidOutput(String),

    /// Writing a published artifact failed.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Exit status reported in [`ConversionError::Invocation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatusCode {
    /// Process exited with this code.
    Code(i32),
    /// Process was terminated without an exit code (e.g. by a signal).
    Terminated,
}

impl std::fmt::Display for ExitStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitStatusCode::Code(code) => write!(f, "exit code {code}"),
            ExitStatusCode::Terminated => write!(f, "terminated by signal"),
        }
    }
}

impl From<Option<i32>> for ExitStatusCode {
    fn from(code: Option<i32>) -> Self {
        match code {
            Some(code) => ExitStatusCode::Code(code),
            None => ExitStatusCode::Terminated,
        }
    }
}
