//! Implementation of the `trellis update` command.

use std::sync::Arc;

use tracing::instrument;

use trellis_adapters::{BuiltinTemplate, ExtensionRegistry, LocalFilesystem};
use trellis_core::{
    application::{ScaffoldService, TOOL_VERSION},
    domain::ScaffoldOpts,
};

use crate::{
    cli::UpdateArgs,
    commands::new::{print_plan, resolve_project_path},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Migrate the project at `args.path` to the running tool version.
///
/// Everything the project recorded about itself (extensions, identity,
/// extension options) is read back from its `Cargo.toml`; the user's
/// configuration only fills what the project never recorded.
#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(args: UpdateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let project_path = resolve_project_path(&args.path)?;

    let opts = ScaffoldOpts::new(&project_path)
        .update(true)
        .pretend(args.pretend)
        .force(args.force);

    let service = ScaffoldService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(BuiltinTemplate),
        Arc::new(ExtensionRegistry::builtin()),
    )
    .with_defaults(config.project_defaults());

    let spinner = output.spinner(&format!("Updating {}", project_path.display()));
    let result = service.create_project(opts);
    spinner.finish_and_clear();
    let (structure, opts) = result?;

    let name = opts.name.as_deref().unwrap_or_default();
    if opts.pretend {
        output.header(&format!("Would update '{name}' to trellis {TOOL_VERSION}:"))?;
        print_plan(&structure, &opts, &output)?;
        return Ok(());
    }

    output.success(&format!("Project '{name}' updated to trellis {TOOL_VERSION}"))?;
    let extensions = opts.extension_names();
    if !extensions.is_empty() {
        output.info(&format!("Extensions: {}", extensions.join(", ")))?;
    }
    Ok(())
}
