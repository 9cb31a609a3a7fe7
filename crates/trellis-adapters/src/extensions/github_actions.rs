use tracing::debug;
use trellis_core::{
    application::services::names,
    domain::{Action, ActionList, Anchor, Extension, FileOp, Node, RenderContext, ScaffoldOpts},
    error::TrellisResult,
};

/// Extra option holding the Rust toolchain the workflow installs.
pub const TOOLCHAIN_OPTION: &str = "github_actions_toolchain";

const DEFAULT_TOOLCHAIN: &str = "stable";
const WORKFLOW_PATH: &str = ".github/workflows/ci.yml";

const WORKFLOW: &str = r#"name: CI

on:
  push:
    branches: [main]
  pull_request:

env:
  CARGO_TERM_COLOR: always

jobs:
  test:
    name: Test {{NAME}}
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: dtolnay/rust-toolchain@master
        with:
          toolchain: {{TOOLCHAIN}}
          components: clippy
      - run: cargo clippy --all-targets -- -D warnings
      - run: cargo test --all-targets
"#;

/// GitHub Actions CI workflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubActions;

impl Extension for GithubActions {
    fn name(&self) -> &str {
        "github-actions"
    }

    fn description(&self) -> &str {
        "Add a GitHub Actions workflow running clippy and tests"
    }

    fn activate(&self, actions: ActionList) -> TrellisResult<ActionList> {
        let enforce = Action::new("enforce_ci_options", |structure, mut opts: ScaffoldOpts| {
            opts.set_default_extra(TOOLCHAIN_OPTION, DEFAULT_TOOLCHAIN);
            Ok((structure, opts))
        });
        let workflow = Action::new("add_ci_workflow", |structure, opts: ScaffoldOpts| {
            let toolchain = opts.extra_str(TOOLCHAIN_OPTION).unwrap_or(DEFAULT_TOOLCHAIN);
            debug!(toolchain, "Adding CI workflow");
            let text = RenderContext::from_opts(&opts)
                .with_variable("TOOLCHAIN", toolchain)
                .render(WORKFLOW);
            Ok((
                structure.merge(WORKFLOW_PATH, Node::file_with(text, FileOp::NoOverwrite)),
                opts,
            ))
        });

        Ok(actions
            .register(enforce, Anchor::after(names::GET_DEFAULT_OPTIONS))?
            .register(workflow, Anchor::after(names::DEFINE_STRUCTURE))?)
    }
}
