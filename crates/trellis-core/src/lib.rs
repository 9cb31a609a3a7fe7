//! Trellis Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Trellis
//! project scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           trellis-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ScaffoldService, MigrationPlanner,     │
//! │  SequentialExecutor)                    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, ProjectTemplate,           │
//! │  ExtensionResolver)                     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    trellis-adapters (Infrastructure)    │
//! └─────────────────────────────────────────┘
//!
//!          Domain Layer (Pure Logic)
//!   Structure, ScaffoldOpts, Action, ActionList,
//!   Extension, Version, VersionGate, Manifest
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trellis_core::prelude::*;
//!
//! let service = ScaffoldService::new(filesystem, template, resolver);
//! let (structure, opts) = service.create_project(ScaffoldOpts::new("my-tool"))?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, MigrationPlan, MigrationPlanner, PipelineRunner, ProjectDefaults,
        ScaffoldService, SequentialExecutor, TOOL_VERSION,
        ports::{ExtensionResolver, Filesystem, ProjectTemplate},
        services::names,
    };
    pub use crate::domain::{
        Action, ActionList, ActionParams, Anchor, DomainError, Extension, ExtensionHandle,
        FileContent, FileOp, Manifest, Node, RenderContext, ScaffoldOpts, Structure, TreePath,
        Version, VersionGate,
    };
    pub use crate::error::{TrellisError, TrellisResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
