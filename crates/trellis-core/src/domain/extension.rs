//! Pluggable extensions.
//!
//! An extension contributes to a pipeline only by inserting, replacing or
//! removing named actions on the [`ActionList`] it is handed. It never runs
//! anything itself.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::domain::action::ActionList;
use crate::error::TrellisResult;

/// A named pipeline modifier.
pub trait Extension: Send + Sync + fmt::Debug {
    /// Unique name, also used as the command-line flag (`--<name>`).
    fn name(&self) -> &str;

    /// One-line summary shown by `trellis extensions`.
    fn description(&self) -> &str {
        ""
    }

    /// Whether the extension is recorded in the generated manifest so that
    /// `update` re-activates it.
    fn persist(&self) -> bool {
        true
    }

    /// Return a new list with this extension's actions registered.
    fn activate(&self, actions: ActionList) -> TrellisResult<ActionList>;
}

/// Shared handle to an extension, as stored in the options bag.
pub type ExtensionHandle = Arc<dyn Extension>;

/// Drop duplicated extensions (by name), keeping the first occurrence and the
/// order in which they were enabled.
pub fn deterministic_sort(extensions: &[ExtensionHandle]) -> Vec<ExtensionHandle> {
    let mut seen = HashSet::new();
    extensions
        .iter()
        .filter(|ext| seen.insert(ext.name().to_string()))
        .cloned()
        .collect()
}

/// Names of the extensions that should be written to the manifest.
pub fn persisted_names(extensions: &[ExtensionHandle]) -> Vec<String> {
    deterministic_sort(extensions)
        .iter()
        .filter(|ext| ext.persist())
        .map(|ext| ext.name().to_string())
        .collect()
}
