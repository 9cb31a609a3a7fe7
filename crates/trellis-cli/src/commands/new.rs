//! Implementation of the `trellis new` command.
//!
//! Responsibility: translate CLI arguments into [`ScaffoldOpts`], call the
//! core scaffold service, and display results. No business logic lives here.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use trellis_adapters::{BuiltinTemplate, ExtensionRegistry, LocalFilesystem};
use trellis_core::{
    application::{
        ApplicationError, ExtensionResolver, ScaffoldService, services::materialize,
    },
    domain::{ScaffoldOpts, Structure},
};

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `trellis new` command.
///
/// Dispatch sequence:
/// 1. Resolve the project path against the current directory
/// 2. Collect extensions from the flags and `defaults.extensions`
/// 3. Run the scaffold pipeline
/// 4. Print the files (pretend) or next-steps guidance
#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(
    args: NewArgs,
    extensions: Vec<String>,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project_path = resolve_project_path(&args.path)?;
    let registry = Arc::new(ExtensionRegistry::builtin());

    let wanted = enabled_extensions(extensions, &config.defaults.extensions);
    let (found, missing) = registry.resolve(&wanted);
    if !missing.is_empty() {
        return Err(CliError::Core(ApplicationError::ExtensionNotFound { names: missing }.into()));
    }
    debug!(extensions = ?wanted, "Extensions enabled");

    let mut opts = ScaffoldOpts::new(&project_path)
        .pretend(args.pretend)
        .force(args.force);
    opts.name = args.name;
    opts.package = args.package;
    opts.author = args.author;
    opts.email = args.email;
    opts.license = args.license;
    opts.description = args.description;
    opts.extensions = found;

    let service = ScaffoldService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(BuiltinTemplate),
        registry,
    )
    .with_defaults(config.project_defaults());

    let spinner = output.spinner(&format!("Creating {}", project_path.display()));
    let result = service.create_project(opts);
    spinner.finish_and_clear();
    let (structure, opts) = result?;

    let name = opts.name.as_deref().unwrap_or_default();
    if opts.pretend {
        output.header(&format!(
            "Would create '{name}' at {}:",
            project_path.display()
        ))?;
        print_plan(&structure, &opts, &output)?;
        return Ok(());
    }

    output.success(&format!(
        "Project '{name}' created at {}",
        project_path.display()
    ))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", args.path.display()))?;
        output.print("  cargo test")?;
    }

    Ok(())
}

/// What materializing `structure` would do to each file, as decided
/// against the disk right now.
pub fn print_plan(structure: &Structure, opts: &ScaffoldOpts, output: &OutputManager) -> CliResult<()> {
    let report = materialize(&LocalFilesystem::new(), structure, opts)?;
    let root = opts.project_path();
    for (path, outcome) in report {
        let shown = path.strip_prefix(root).unwrap_or(&path);
        output.item(outcome.as_str(), &shown.display().to_string())?;
    }
    Ok(())
}

/// Flags first, then configured defaults not already named.
fn enabled_extensions(flags: Vec<String>, configured: &[String]) -> Vec<String> {
    let mut names = flags;
    for name in configured {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Absolute, lexically normalised project path. The last segment must be a
/// usable directory name.
pub fn resolve_project_path(path: &Path) -> CliResult<PathBuf> {
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir()?
    };

    let mut resolved = base;
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }

    match resolved.file_name().and_then(|n| n.to_str()) {
        Some(name) if !name.starts_with('.') => Ok(resolved),
        Some(_) => Err(CliError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "the directory name cannot start with '.'".into(),
        }),
        None => Err(CliError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "cannot extract a directory name".into(),
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
