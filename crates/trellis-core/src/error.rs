//! Crate-wide error type.
//!
//! [`DomainError`] covers broken tree, list and version rules;
//! [`ApplicationError`] covers failures while a pipeline is assembled or run.
//! A failure inside a pipeline arrives wrapped in the extension or action that
//! raised it, and [`TrellisError::root_cause`] / [`TrellisError::trail`] take
//! those wrappers apart again.

use std::fmt;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

#[derive(Debug, Error, Clone)]
pub enum TrellisError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Application(#[from] ApplicationError),
}

pub type TrellisResult<T> = Result<T, TrellisError>;

/// Broad class of a failure; front ends turn it into exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input: options, versions, paths, manifest syntax.
    Validation,
    /// The pipeline could not be put together.
    Assembly,
    NotFound,
    Internal,
}

/// One pipeline wrapper around an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineFrame<'a> {
    Extension(&'a str),
    Action { name: &'a str, position: usize },
}

impl fmt::Display for PipelineFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension(name) => write!(f, "extension `{name}`"),
            Self::Action { name, position } => write!(f, "action `{name}` (step {position})"),
        }
    }
}

impl TrellisError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
        }
    }

    /// The failure itself, with every extension and action wrapper removed.
    pub fn root_cause(&self) -> &TrellisError {
        self.unwrap_frame().map_or(self, |(_, inner)| inner.root_cause())
    }

    /// Extension and action wrappers around the root cause, outermost first.
    pub fn trail(&self) -> Vec<PipelineFrame<'_>> {
        let mut frames = Vec::new();
        let mut current = self;
        while let Some((frame, inner)) = current.unwrap_frame() {
            frames.push(frame);
            current = inner;
        }
        frames
    }

    fn unwrap_frame(&self) -> Option<(PipelineFrame<'_>, &TrellisError)> {
        match self {
            Self::Application(ApplicationError::ActionExecution {
                action,
                position,
                source,
            }) => Some((
                PipelineFrame::Action {
                    name: action.as_str(),
                    position: *position,
                },
                source.as_ref(),
            )),
            Self::Application(ApplicationError::ExtensionActivation { extension, source }) => {
                Some((PipelineFrame::Extension(extension.as_str()), source.as_ref()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> TrellisError {
        let inner = TrellisError::from(DomainError::ActionNotFound { name: "x".into() });
        TrellisError::from(ApplicationError::ExtensionActivation {
            extension: "ext".into(),
            source: Box::new(TrellisError::from(ApplicationError::ActionExecution {
                action: "a".into(),
                position: 2,
                source: Box::new(inner),
            })),
        })
    }

    #[test]
    fn root_cause_unwraps_pipeline_wrappers() {
        let err = nested();
        assert!(matches!(
            err.root_cause(),
            TrellisError::Domain(DomainError::ActionNotFound { .. })
        ));
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn trail_lists_wrappers_outermost_first() {
        let err = nested();
        assert_eq!(
            err.trail(),
            [
                PipelineFrame::Extension("ext"),
                PipelineFrame::Action { name: "a", position: 2 },
            ]
        );
        assert_eq!(err.trail()[1].to_string(), "action `a` (step 2)");
    }

    #[test]
    fn unwrapped_error_has_empty_trail() {
        let err = TrellisError::from(DomainError::DuplicateActionName { name: "a".into() });
        assert!(err.trail().is_empty());
        assert!(matches!(err.root_cause(), TrellisError::Domain(_)));
    }
}
