//! The options bag threaded through every action.
//!
//! Well-known keys are typed fields; anything an extension wants to carry
//! lives in [`ScaffoldOpts::extra`]. The bag is cloned freely: an action
//! receives it by value and hands back the (possibly edited) copy.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::{
    error::DomainError,
    extension::{Extension, ExtensionHandle},
    version::Version,
};

/// Options consumed and produced by actions.
#[derive(Clone, Default)]
pub struct ScaffoldOpts {
    /// Where the project lives (or will live).
    pub project_path: PathBuf,
    /// Compute everything but perform no external effect.
    pub pretend: bool,
    /// Update an existing project instead of creating one.
    pub update: bool,
    /// Allow creating into an existing directory.
    pub force: bool,

    pub name: Option<String>,
    pub package: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub license: Option<String>,
    pub description: Option<String>,

    /// Tool version stamped into the generated manifest.
    pub version: Option<Version>,

    /// Build dependencies collected during migration (`name@req`).
    pub build_deps: Vec<String>,

    /// Enabled extensions, in activation order.
    pub extensions: Vec<ExtensionHandle>,

    /// Free-form options, typically prefixed with an extension name.
    pub extra: BTreeMap<String, Value>,
}

impl ScaffoldOpts {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            ..Self::default()
        }
    }

    pub fn pretend(mut self, pretend: bool) -> Self {
        self.pretend = pretend;
        self
    }

    pub fn update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(std::sync::Arc::new(extension));
        self
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e.name() == name)
    }

    pub fn required_name(&self) -> Result<&str, DomainError> {
        self.name
            .as_deref()
            .ok_or(DomainError::MissingRequiredField { field: "name" })
    }

    pub fn required_package(&self) -> Result<&str, DomainError> {
        self.package
            .as_deref()
            .ok_or(DomainError::MissingRequiredField { field: "package" })
    }

    pub fn get_extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// String value of an extra option, if it is one.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }

    /// Insert `value` only when `key` is not set yet.
    pub fn set_default_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.entry(key.into()).or_insert_with(|| value.into());
    }
}

impl fmt::Debug for ScaffoldOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaffoldOpts")
            .field("project_path", &self.project_path)
            .field("pretend", &self.pretend)
            .field("update", &self.update)
            .field("force", &self.force)
            .field("name", &self.name)
            .field("package", &self.package)
            .field("author", &self.author)
            .field("email", &self.email)
            .field("license", &self.license)
            .field("description", &self.description)
            .field("version", &self.version.as_ref().map(ToString::to_string))
            .field("build_deps", &self.build_deps)
            .field("extensions", &self.extension_names())
            .field("extra", &self.extra)
            .finish()
    }
}

/// Extensions compare by name; everything else by value.
impl PartialEq for ScaffoldOpts {
    fn eq(&self, other: &Self) -> bool {
        self.project_path == other.project_path
            && self.pretend == other.pretend
            && self.update == other.update
            && self.force == other.force
            && self.name == other.name
            && self.package == other.package
            && self.author == other.author
            && self.email == other.email
            && self.license == other.license
            && self.description == other.description
            && self.version == other.version
            && self.build_deps == other.build_deps
            && self.extension_names() == other.extension_names()
            && self.extra == other.extra
    }
}
