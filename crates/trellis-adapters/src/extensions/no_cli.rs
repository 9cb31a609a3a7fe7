use trellis_core::{
    application::services::names,
    domain::{Action, ActionList, Anchor, Extension, Manifest, Node, Structure, MANIFEST_FILE},
    error::TrellisResult,
};

/// Library-only project: no binary target, no CLI test.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCli;

impl Extension for NoCli {
    fn name(&self) -> &str {
        "no-cli"
    }

    fn description(&self) -> &str {
        "Library only, without src/main.rs and its test"
    }

    fn activate(&self, actions: ActionList) -> TrellisResult<ActionList> {
        let action = Action::new("remove_cli_files", |structure, opts| {
            Ok((remove_cli_files(structure)?, opts))
        });
        Ok(actions.register(action, Anchor::after(names::DEFINE_STRUCTURE))?)
    }
}

fn remove_cli_files(structure: Structure) -> TrellisResult<Structure> {
    let mut structure = structure.reject("src/main.rs").reject("tests/cli.rs");
    if matches!(structure.get("tests"), Some(Node::Dir(tests)) if tests.is_empty()) {
        structure = structure.reject("tests");
    }

    let Some(content) = structure.get(MANIFEST_FILE).and_then(Node::as_file).cloned() else {
        return Ok(structure);
    };
    let mut manifest = Manifest::parse(content.text())?;
    if !manifest.remove_bin_targets() {
        return Ok(structure);
    }
    Ok(structure.merge(MANIFEST_FILE, Node::file_with(manifest.to_string(), content.op())))
}
