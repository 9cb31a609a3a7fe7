//! Extensions shipped with Trellis and the registry resolving them by name.

mod github_actions;
mod no_cli;
mod no_readme;

use std::sync::Arc;

use trellis_core::{application::ports::ExtensionResolver, domain::ExtensionHandle};

pub use github_actions::{GithubActions, TOOLCHAIN_OPTION};
pub use no_cli::NoCli;
pub use no_readme::NoReadme;

/// Known extensions, in listing order.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    extensions: Vec<ExtensionHandle>,
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in extension.
    pub fn builtin() -> Self {
        Self::new()
            .with_extension(Arc::new(NoCli))
            .with_extension(Arc::new(GithubActions))
            .with_extension(Arc::new(NoReadme))
    }

    /// Add an extension. On a name clash the first registered one wins.
    pub fn with_extension(mut self, extension: ExtensionHandle) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn get(&self, name: &str) -> Option<ExtensionHandle> {
        self.extensions.iter().find(|e| e.name() == name).cloned()
    }
}

impl ExtensionResolver for ExtensionRegistry {
    fn available(&self) -> Vec<ExtensionHandle> {
        self.extensions.clone()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_names() {
        let names: Vec<String> = ExtensionRegistry::builtin()
            .available()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, ["no-cli", "github-actions", "no-readme"]);
    }

    #[test]
    fn every_builtin_is_described() {
        for ext in ExtensionRegistry::builtin().available() {
            assert!(!ext.description().is_empty(), "{} has no description", ext.name());
        }
    }

    #[test]
    fn resolve_reports_unknown_names() {
        let registry = ExtensionRegistry::builtin();
        let (found, missing) =
            registry.resolve(&["github-actions".to_string(), "docker".to_string()]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "github-actions");
        assert_eq!(missing, ["docker"]);
    }

    #[test]
    fn lookup_by_name() {
        let registry = ExtensionRegistry::builtin();
        assert!(registry.get("no-cli").is_some());
        assert!(registry.get("No-Cli").is_none());
    }
}
