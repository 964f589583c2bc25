//! Error types for the packaging pipeline
//!
//! Every stage returns [`PackageResult`]. None of the variants are
//! recoverable inside the pipeline; they surface to the caller as-is.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type PackageResult<T> = Result<T, PackageError>;

/// Main error type for the packaging pipeline
#[derive(Error, Debug)]
pub enum PackageError {
    /// A required setting is missing or empty
    #[error("`{field}` required - {hint}")]
    Configuration {
        field: &'static str,
        hint: &'static str,
    },

    /// A generated file could not be created, removed or read
    #[error("failed to {action} {path}: {source}")]
    FileSystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The deployment tool is missing or exited unsuccessfully
    #[error("{program} failed ({}): {}", describe_exit(.exit_code), .stderr.trim())]
    ExternalTool {
        program: PathBuf,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The produced package could not be read or rewritten
    #[error("archive error in {path}: {message}")]
    Archive { path: PathBuf, message: String },
}

impl PackageError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Name of the missing setting, for configuration errors
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            Self::Configuration { field, .. } => Some(*field),
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}
