//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `trellis-adapters` crate provides implementations.

use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::domain::{ExtensionHandle, ScaffoldOpts, Structure};
use crate::error::TrellisResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `trellis_adapters::filesystem::LocalFilesystem` (production)
/// - `trellis_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> TrellisResult<()>;

    /// Write content to a file, replacing it if it exists.
    fn write_file(&self, path: &Path, content: &str) -> TrellisResult<()>;

    fn read_to_string(&self, path: &Path) -> TrellisResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> TrellisResult<()>;
}

/// Port providing the base project tree.
///
/// Implemented by `trellis_adapters::template::BuiltinTemplate`.
#[cfg_attr(test, automock)]
pub trait ProjectTemplate: Send + Sync {
    /// Tree of files for a project described by `opts`. Content is final:
    /// placeholders are already rendered.
    fn structure(&self, opts: &ScaffoldOpts) -> TrellisResult<Structure>;
}

/// Port turning extension names into extensions.
///
/// Implemented by `trellis_adapters::extensions::ExtensionRegistry`.
#[cfg_attr(test, automock)]
pub trait ExtensionResolver: Send + Sync {
    /// Every extension this resolver knows about.
    fn available(&self) -> Vec<ExtensionHandle>;

    /// Resolve `names`, returning the extensions found (in the order asked)
    /// and the names nobody provides.
    fn resolve(&self, names: &[String]) -> (Vec<ExtensionHandle>, Vec<String>) {
        let available = self.available();
        let mut found = Vec::new();
        let mut missing = Vec::new();
        for name in names {
            match available.iter().find(|ext| ext.name() == name) {
                Some(ext) => found.push(ext.clone()),
                None => missing.push(name.clone()),
            }
        }
        (found, missing)
    }
}
