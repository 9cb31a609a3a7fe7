//! Errors the `trellis` binary reports, their exit codes, and how they are
//! printed on stderr.
//!
//! Core errors are shown by their root cause. The extensions and actions
//! they travelled through are listed beneath it, so a failing step can be
//! told apart from the input that made it fail.

use std::error::Error as _;
use std::fmt;
use std::io;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{debug, error};
use trellis_core::error::{ErrorCategory, TrellisError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// The path given to `new` or `update` cannot name a project.
    #[error("Invalid project path '{}': {reason}", path.display())]
    InvalidProjectPath { path: PathBuf, reason: String },

    /// `trellis init` would overwrite an existing file.
    #[error("Configuration file already exists at {}", path.display())]
    ConfigExists { path: PathBuf },

    /// The configuration could not be read, serialised or queried.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Core(#[from] TrellisError),

    /// Writing the config file or the terminal failed.
    #[error("{what}: {error}")]
    Io { what: String, error: io::Error },
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        Self::Io {
            what: "Failed to write output".into(),
            error,
        }
    }
}

impl CliError {
    /// `map_err` adapter naming what was being done when `io::Error` hit.
    pub fn io(what: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let what = what.into();
        move |error| Self::Io { what, error }
    }

    /// First line of the report.
    pub fn headline(&self) -> String {
        match self {
            Self::Core(core) => core.root_cause().to_string(),
            other => other.to_string(),
        }
    }

    /// Underlying errors the headline does not already spell out.
    pub fn causes(&self) -> Vec<String> {
        let start = match self {
            Self::Core(core) => core.root_cause().source(),
            other => other.source(),
        };
        let headline = self.headline();
        std::iter::successors(start, |&e| e.source())
            .map(ToString::to_string)
            .filter(|cause| !headline.ends_with(cause.as_str()))
            .collect()
    }

    pub fn hints(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectPath { .. } => vec![
                "Pass a path ending in a directory name, such as my-tool or ../libs/parser".into(),
            ],
            Self::ConfigExists { .. } => {
                vec!["Use --force to overwrite it with the defaults".into()]
            }
            Self::ConfigError { .. } => vec![
                "Run `trellis config path` to see which file is read".into(),
                "Run `trellis init` to write a default one".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::Io { .. } => Vec::new(),
        }
    }

    /// | Code | When                                        |
    /// |------|---------------------------------------------|
    /// |  1   | I/O failures and internal errors            |
    /// |  2   | bad input, or a pipeline that cannot build  |
    /// |  3   | project, version or extension not found     |
    /// |  4   | configuration                               |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidProjectPath { .. } | Self::ConfigExists { .. } => 2,
            Self::ConfigError { .. } => 4,
            Self::Io { .. } => 1,
            Self::Core(core) => match core.category() {
                ErrorCategory::Validation | ErrorCategory::Assembly => 2,
                ErrorCategory::NotFound => 3,
                ErrorCategory::Internal => 1,
            },
        }
    }

    pub fn report(&self, verbose: bool, color: bool) -> Report<'_> {
        Report {
            error: self,
            verbose,
            color,
        }
    }

    pub fn log(&self) {
        let code = self.exit_code();
        let trail: Vec<String> = match self {
            Self::Core(core) => core.trail().iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        };
        // Anything but an internal failure is already on stderr as the report.
        if code == 1 {
            error!(code, ?trail, "{}", self.headline());
        } else {
            debug!(code, ?trail, "{}", self.headline());
        }
    }
}

/// Renders a [`CliError`] for stderr.
pub struct Report<'a> {
    error: &'a CliError,
    verbose: bool,
    color: bool,
}

impl Report<'_> {
    fn paint(&self, text: &str, style: fn(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.paint("error:", |t| t.red().bold().to_string());
        let headline = self.paint(&self.error.headline(), |t| t.bold().to_string());
        writeln!(f, "{label} {headline}")?;

        if let CliError::Core(core) = self.error {
            for frame in core.trail() {
                writeln!(f, "  {} {frame}", self.paint("in", |t| t.dimmed().to_string()))?;
            }
        }

        let causes = self.error.causes();
        if self.verbose {
            let label = self.paint("Caused by:", |t| t.dimmed().to_string());
            for cause in &causes {
                writeln!(f, "  {label} {cause}")?;
            }
        }

        let label = self.paint("hint:", |t| t.cyan().to_string());
        for hint in self.error.hints() {
            writeln!(f, "  {label} {hint}")?;
        }

        if !self.verbose && !causes.is_empty() {
            writeln!(f, "  (run with -v to see what caused this)")?;
        }
        Ok(())
    }
}
