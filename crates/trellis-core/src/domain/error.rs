// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::error::ErrorCategory;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside pipeline errors)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Pipeline assembly
    // ========================================================================
    #[error("Impossible to find the required action: `{name}`")]
    ActionNotFound { name: String },

    #[error("An action named `{name}` is already registered")]
    DuplicateActionName { name: String },

    #[error("Invalid action name '{name}': {reason}")]
    InvalidActionName { name: String, reason: String },

    // ========================================================================
    // Validation
    // ========================================================================
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("'{identifier}' is not a valid {what}")]
    InvalidIdentifier {
        identifier: String,
        what: &'static str,
    },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ActionNotFound { name } => vec![
                format!("No action named `{name}` exists in the pipeline"),
                "An extension may depend on another extension being enabled first".into(),
                "Try: trellis extensions to see what is available".into(),
            ],
            Self::DuplicateActionName { name } => vec![
                format!("Two steps tried to register `{name}`"),
                "Check for extensions that are enabled twice or that conflict".into(),
            ],
            Self::InvalidVersion { input, .. } => vec![
                format!("Could not read '{input}' as a version"),
                "Versions look like 1, 1.2 or 1.2.3".into(),
            ],
            Self::InvalidIdentifier { identifier, .. } => vec![
                format!("'{identifier}' cannot be used as a Rust identifier"),
                "Use lowercase letters, digits and underscores, starting with a letter".into(),
                "Pass a different value with --package".into(),
            ],
            Self::InvalidManifest(_) => vec![
                "The project's Cargo.toml could not be parsed".into(),
                "Fix the syntax error and run the command again".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ActionNotFound { .. } => ErrorCategory::NotFound,
            Self::DuplicateActionName { .. } | Self::InvalidActionName { .. } => {
                ErrorCategory::Assembly
            }
            Self::InvalidVersion { .. }
            | Self::InvalidIdentifier { .. }
            | Self::InvalidPath { .. }
            | Self::InvalidManifest(_)
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
        }
    }
}
