//! Application layer errors.
//!
//! These errors represent failures while assembling or running a pipeline,
//! not violated domain rules. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCategory, TrellisError};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// An action failed while the pipeline was running.
    #[error("Action `{action}` (step {position}) failed: {source}")]
    ActionExecution {
        action: String,
        position: usize,
        #[source]
        source: Box<TrellisError>,
    },

    /// An extension could not modify the pipeline.
    #[error("Extension `{extension}` could not be activated: {source}")]
    ExtensionActivation {
        extension: String,
        #[source]
        source: Box<TrellisError>,
    },

    /// The project records a version string that cannot be parsed.
    #[error("Recorded tool version '{value}' cannot be parsed: {reason}")]
    UnparseableRecordedVersion { value: String, reason: String },

    /// The project does not record which tool version generated it.
    #[error("No tool version recorded in {path}")]
    NoRecordedVersion { path: PathBuf },

    /// Persisted or requested extensions that nobody provides.
    #[error("Unknown extension(s): {}", names.join(", "))]
    ExtensionNotFound { names: Vec<String> },

    #[error("Directory {path} already exists")]
    DirectoryAlreadyExists { path: PathBuf },

    #[error("Directory {path} does not exist")]
    DirectoryDoesNotExist { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ActionExecution { source, .. } | Self::ExtensionActivation { source, .. } => {
                source.suggestions()
            }
            Self::UnparseableRecordedVersion { .. } => vec![
                "Fix `version` under [package.metadata.trellis] in Cargo.toml".into(),
                "Versions look like 1, 1.2 or 1.2.3".into(),
            ],
            Self::NoRecordedVersion { .. } => vec![
                "This project was not generated by trellis, or its metadata was removed".into(),
                "Add `version = \"0.1\"` under [package.metadata.trellis] to update anyway".into(),
            ],
            Self::ExtensionNotFound { .. } => vec![
                "Try: trellis extensions to see what is available".into(),
                "Remove the name from [package.metadata.trellis].extensions".into(),
            ],
            Self::DirectoryAlreadyExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to generate into it anyway".into(),
                "Or run: trellis update to migrate an existing project".into(),
            ],
            Self::DirectoryDoesNotExist { path } => vec![
                format!("Nothing to update at {}", path.display()),
                "Try: trellis new to create the project first".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ActionExecution { source, .. } | Self::ExtensionActivation { source, .. } => {
                source.category()
            }
            Self::UnparseableRecordedVersion { .. } | Self::DirectoryAlreadyExists { .. } => {
                ErrorCategory::Validation
            }
            Self::NoRecordedVersion { .. }
            | Self::ExtensionNotFound { .. }
            | Self::DirectoryDoesNotExist { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
        }
    }
}
