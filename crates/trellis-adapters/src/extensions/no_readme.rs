use trellis_core::{
    application::services::names,
    domain::{Action, ActionList, Anchor, Extension, Structure},
    error::TrellisResult,
};

/// Skip the README for this run. Not recorded in the manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReadme;

impl Extension for NoReadme {
    fn name(&self) -> &str {
        "no-readme"
    }

    fn description(&self) -> &str {
        "Do not generate README.md (this run only)"
    }

    fn persist(&self) -> bool {
        false
    }

    fn activate(&self, actions: ActionList) -> TrellisResult<ActionList> {
        let action = Action::new("remove_readme", |structure: Structure, opts| {
            Ok((structure.reject("README.md"), opts))
        });
        Ok(actions.register(action, Anchor::before(names::VERIFY_PROJECT_DIR))?)
    }
}
