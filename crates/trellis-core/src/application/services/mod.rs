//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create a project" or "migrate a project".

pub mod materializer;
pub mod migration;
pub mod pipeline;
pub mod project_info;
pub mod scaffold_service;

pub use materializer::{Outcome, materialize};
pub use migration::{
    MigrationPlan, MigrationPlanner, RUNTIME_DEPENDENCIES, TOOL_VERSION, builtin_plan,
    manifest_action,
};
pub use pipeline::{PipelineRunner, SequentialExecutor, activate_extensions};
pub use scaffold_service::{ProjectDefaults, ScaffoldService, names};
