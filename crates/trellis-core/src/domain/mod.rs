//! Core domain layer for Trellis.
//!
//! Pure data and pipeline assembly rules. Nothing in here touches the
//! filesystem; I/O happens in application services through ports.
//!
//! - [`structure`]: the in-memory project tree
//! - [`options`]: the options bag threaded through actions
//! - [`action`]: named actions and the immutable [`ActionList`]
//! - [`extension`]: pipeline modifiers
//! - [`version`]: tool versions and migration gates
//! - [`manifest`]: the persisted `Cargo.toml` document

pub mod action;
pub mod error;
pub mod extension;
pub mod manifest;
pub mod options;
pub mod render;
pub mod structure;
pub mod version;

mod validation;

pub use action::{Action, ActionList, ActionParams, Anchor};
pub use error::DomainError;
pub use extension::{Extension, ExtensionHandle, deterministic_sort, persisted_names};
pub use manifest::{MANIFEST_FILE, METADATA_KEY, Manifest, split_author};
pub use options::ScaffoldOpts;
pub use render::{RenderContext, to_kebab_case, to_pascal_case, to_snake_case};
pub use structure::{FileContent, FileOp, Node, Structure, TreePath};
pub use validation::DomainValidator;
pub use version::{Version, VersionGate};
