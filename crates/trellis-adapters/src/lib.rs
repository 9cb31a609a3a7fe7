//! Infrastructure adapters for Trellis.
//!
//! This crate implements the ports defined in `trellis-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod extensions;
pub mod filesystem;
pub mod template;

// Re-export commonly used adapters
pub use extensions::{ExtensionRegistry, GithubActions, NoCli, NoReadme};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use template::BuiltinTemplate;
