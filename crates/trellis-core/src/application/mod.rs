//! Application layer for Trellis.
//!
//! This layer contains:
//! - **Services**: pipeline execution, migrations, the scaffold use case
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer; rules about what a
//! valid pipeline or project looks like live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    MigrationPlan, MigrationPlanner, PipelineRunner, ProjectDefaults, ScaffoldService,
    SequentialExecutor, TOOL_VERSION, activate_extensions,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ExtensionResolver, Filesystem, ProjectTemplate};

pub use error::ApplicationError;
