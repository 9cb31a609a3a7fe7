//! Version-gated migrations.
//!
//! A [`MigrationPlan`] is an ordered catalogue of `(gate, actions)` groups.
//! On update the planner keeps the groups whose gate matches the version
//! recorded in the project's manifest, flattens them in declaration order and
//! drives the result through a [`PipelineRunner`].

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem, services::project_info},
    domain::{
        Action, ActionList, ActionParams, DomainError, Manifest, ScaffoldOpts, Structure,
        Version, VersionGate, persisted_names,
    },
    error::TrellisResult,
};

use super::pipeline::PipelineRunner;

/// Version of the tool, stamped into generated projects.
pub const TOOL_VERSION: Version = Version::new(1, 0, 0);

/// Dependencies every generated project should declare.
pub const RUNTIME_DEPENDENCIES: &[(&str, &str)] = &[("anyhow", "1")];

/// Edition assigned to projects still on an older one.
pub const TARGET_EDITION: &str = "2021";

const LEGACY_EDITIONS: [&str; 2] = ["2015", "2018"];

// ── Plan ────────────────────────────────────────────────────────────────────

/// Ordered `(gate, actions)` groups. Declaration order is execution order.
#[derive(Debug, Clone, Default)]
pub struct MigrationPlan {
    groups: Vec<(VersionGate, Vec<Action>)>,
}

impl MigrationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, gate: VersionGate, actions: impl IntoIterator<Item = Action>) -> Self {
        self.groups.push((gate, actions.into_iter().collect()));
        self
    }

    pub fn groups(&self) -> &[(VersionGate, Vec<Action>)] {
        &self.groups
    }

    /// Actions of every matching group, in declaration order.
    ///
    /// Fails with `DuplicateActionName` when two selected actions share a name.
    pub fn flatten(&self, recorded: &Version) -> Result<ActionList, DomainError> {
        let selected = self
            .groups
            .iter()
            .filter(|(gate, _)| gate.matches(recorded))
            .flat_map(|(_, actions)| actions.iter().cloned());
        ActionList::from_actions(selected)
    }
}

// ── Planner ─────────────────────────────────────────────────────────────────

/// Runs the migration plan for projects in update mode.
pub struct MigrationPlanner<R: PipelineRunner> {
    plan: MigrationPlan,
    runner: R,
    filesystem: Arc<dyn Filesystem>,
    tool_version: Version,
}

impl<R: PipelineRunner> MigrationPlanner<R> {
    pub fn new(plan: MigrationPlan, runner: R, filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            plan,
            runner,
            filesystem,
            tool_version: TOOL_VERSION,
        }
    }

    pub fn with_tool_version(mut self, version: Version) -> Self {
        self.tool_version = version;
        self
    }

    pub fn plan(&self) -> &MigrationPlan {
        &self.plan
    }

    /// Version recorded in the project's manifest.
    pub fn recorded_version(&self, opts: &ScaffoldOpts) -> TrellisResult<Version> {
        let manifest = project_info::read_manifest(self.filesystem.as_ref(), opts.project_path())?;
        match manifest.recorded_version() {
            Ok(Some(version)) => Ok(version),
            Ok(None) => Err(ApplicationError::NoRecordedVersion {
                path: project_info::manifest_path(opts.project_path()),
            }
            .into()),
            Err(e) => Err(ApplicationError::UnparseableRecordedVersion {
                value: manifest.recorded_version_text().unwrap_or_default(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    /// Migrate an existing project; a no-op outside update mode.
    #[instrument(skip_all, fields(project = %opts.project_path().display()))]
    pub fn migrate(&self, structure: Structure, mut opts: ScaffoldOpts) -> TrellisResult<ActionParams> {
        if !opts.update {
            return Ok((structure, opts));
        }

        let recorded = self.recorded_version(&opts)?;
        let actions = self.plan.flatten(&recorded)?;
        info!(
            from = %recorded,
            to = %self.tool_version,
            steps = actions.len(),
            "Migrating project"
        );

        opts.version = Some(self.tool_version.clone());
        self.runner.run(&actions, structure, opts)
    }
}

// ── Built-in plan ───────────────────────────────────────────────────────────

/// The migrations shipped with this version of the tool.
pub fn builtin_plan(filesystem: Arc<dyn Filesystem>) -> MigrationPlan {
    let fs = || Arc::clone(&filesystem);
    MigrationPlan::new()
        .group(
            VersionGate::Threshold(Version::new(0, 3, 0)),
            [manifest_action("add_binary_target", fs(), add_binary_target)],
        )
        .group(
            VersionGate::Always,
            [
                manifest_action("update_trellis_metadata", fs(), update_trellis_metadata),
                manifest_action("add_dependencies", fs(), add_dependencies),
            ],
        )
        .group(
            VersionGate::Threshold(Version::new(1, 0, 0)),
            [
                manifest_action("migrate_edition", fs(), migrate_edition),
                manifest_action("handover_build_metadata", fs(), handover_build_metadata),
                update_build_dependencies(fs()),
            ],
        )
}

/// Wrap a manifest transformation into an action.
///
/// The manifest is read from the project, handed to `edit`, and written back
/// only when `edit` succeeded and `opts.pretend` is false.
pub fn manifest_action<F>(name: &str, filesystem: Arc<dyn Filesystem>, edit: F) -> Action
where
    F: Fn(&mut Manifest, &Structure, &mut ScaffoldOpts) -> TrellisResult<()> + Send + Sync + 'static,
{
    let action = name.to_string();
    Action::new(name, move |structure, mut opts| {
        let root = opts.project_path().to_path_buf();
        let mut manifest = project_info::read_manifest(filesystem.as_ref(), &root)?;
        edit(&mut manifest, &structure, &mut opts)?;

        if opts.pretend {
            debug!(action = %action, "Pretend: manifest left untouched");
        } else {
            project_info::write_manifest(filesystem.as_ref(), &root, &manifest)?;
            info!(action = "updated", path = %project_info::manifest_path(&root).display());
        }
        Ok((structure, opts))
    })
}

fn add_binary_target(
    manifest: &mut Manifest,
    structure: &Structure,
    opts: &mut ScaffoldOpts,
) -> TrellisResult<()> {
    if manifest.has_bin_targets() || !structure.contains("src/main.rs") {
        return Ok(());
    }
    manifest.add_bin_target(opts.required_name()?, "src/main.rs")?;
    Ok(())
}

fn update_trellis_metadata(
    manifest: &mut Manifest,
    _structure: &Structure,
    opts: &mut ScaffoldOpts,
) -> TrellisResult<()> {
    let version = opts
        .version
        .clone()
        .ok_or(DomainError::MissingRequiredField { field: "version" })?;
    manifest.stamp(
        &version,
        opts.package.as_deref(),
        &persisted_names(&opts.extensions),
        &opts.extra,
    )?;
    Ok(())
}

fn add_dependencies(
    manifest: &mut Manifest,
    _structure: &Structure,
    _opts: &mut ScaffoldOpts,
) -> TrellisResult<()> {
    for (name, req) in RUNTIME_DEPENDENCIES {
        manifest.ensure_dependency("dependencies", name, req)?;
    }
    Ok(())
}

fn migrate_edition(
    manifest: &mut Manifest,
    _structure: &Structure,
    _opts: &mut ScaffoldOpts,
) -> TrellisResult<()> {
    let outdated = manifest
        .package_str("edition")
        .is_none_or(|edition| LEGACY_EDITIONS.contains(&edition));
    if outdated {
        manifest.set_package_str("edition", TARGET_EDITION)?;
    }
    Ok(())
}

fn handover_build_metadata(
    manifest: &mut Manifest,
    _structure: &Structure,
    opts: &mut ScaffoldOpts,
) -> TrellisResult<()> {
    for dep in manifest.take_build_requires()? {
        if !opts.build_deps.contains(&dep) {
            opts.build_deps.push(dep);
        }
    }
    Ok(())
}

/// Merge the build dependencies collected by `handover_build_metadata` into
/// `[build-dependencies]`. Dependencies already declared win; the tool itself
/// is never a build dependency.
fn update_build_dependencies(filesystem: Arc<dyn Filesystem>) -> Action {
    Action::new("update_build_dependencies", move |structure, mut opts| {
        let build_deps = std::mem::take(&mut opts.build_deps);
        if build_deps.is_empty() || opts.pretend {
            return Ok((structure, opts));
        }

        let root = opts.project_path().to_path_buf();
        let mut manifest = project_info::read_manifest(filesystem.as_ref(), &root)?;
        for dep in &build_deps {
            let (name, req) = split_requirement(dep);
            if name != "trellis" {
                manifest.ensure_dependency("build-dependencies", name, req)?;
            }
        }
        manifest.remove_dependency("build-dependencies", "trellis");
        project_info::write_manifest(filesystem.as_ref(), &root, &manifest)?;
        info!(action = "updated", deps = ?build_deps, "Build dependencies");

        Ok((structure, opts))
    })
}

/// `"cc@1.0"` -> `("cc", "1.0")`, `"cc"` -> `("cc", "*")`.
fn split_requirement(dep: &str) -> (&str, &str) {
    match dep.split_once('@') {
        Some((name, req)) if !req.trim().is_empty() => (name.trim(), req.trim()),
        Some((name, _)) => (name.trim(), "*"),
        None => (dep.trim(), "*"),
    }
}
