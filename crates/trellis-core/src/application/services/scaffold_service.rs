//! Scaffold Service - main application orchestrator.
//!
//! This service assembles the base pipeline, lets the enabled extensions
//! modify it, and runs it:
//!
//! 1. `get_default_options`: merge persisted metadata (update) and fill defaults
//! 2. `verify_options_consistency`: validate name and package
//! 3. `define_structure`: ask the template for the base tree
//! 4. `verify_project_dir`: refuse to clobber or to update nothing
//! 5. `version_migration`: replay version-gated migrations (update)
//! 6. `create_structure`: write the tree
//! 7. `report_done`
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ExtensionResolver, Filesystem, ProjectTemplate},
        services::{
            materializer::materialize,
            migration::{MigrationPlan, MigrationPlanner, TOOL_VERSION, builtin_plan},
            pipeline::{PipelineRunner, SequentialExecutor, activate_extensions},
            project_info,
        },
    },
    domain::{
        Action, ActionList, ActionParams, DomainValidator as validator, ExtensionHandle,
        ScaffoldOpts, Structure, to_snake_case,
    },
    error::TrellisResult,
};

/// Names of the base actions, for extensions to anchor on.
pub mod names {
    pub const GET_DEFAULT_OPTIONS: &str = "get_default_options";
    pub const VERIFY_OPTIONS_CONSISTENCY: &str = "verify_options_consistency";
    pub const DEFINE_STRUCTURE: &str = "define_structure";
    pub const VERIFY_PROJECT_DIR: &str = "verify_project_dir";
    pub const VERSION_MIGRATION: &str = "version_migration";
    pub const CREATE_STRUCTURE: &str = "create_structure";
    pub const REPORT_DONE: &str = "report_done";
}

pub const DEFAULT_AUTHOR: &str = "Your Name";
pub const DEFAULT_EMAIL: &str = "you@example.com";
pub const DEFAULT_LICENSE: &str = "MIT";

/// Fallback values for options the user did not give, typically read from
/// the user's configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDefaults {
    pub author: Option<String>,
    pub email: Option<String>,
    pub license: Option<String>,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Arc<dyn Filesystem>,
    template: Arc<dyn ProjectTemplate>,
    resolver: Arc<dyn ExtensionResolver>,
    planner: Arc<MigrationPlanner<SequentialExecutor>>,
    defaults: ProjectDefaults,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters and the
    /// built-in migration plan.
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        template: Arc<dyn ProjectTemplate>,
        resolver: Arc<dyn ExtensionResolver>,
    ) -> Self {
        let plan = builtin_plan(Arc::clone(&filesystem));
        Self {
            planner: Arc::new(MigrationPlanner::new(
                plan,
                SequentialExecutor,
                Arc::clone(&filesystem),
            )),
            filesystem,
            template,
            resolver,
            defaults: ProjectDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ProjectDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_migration_plan(mut self, plan: MigrationPlan) -> Self {
        self.planner = Arc::new(MigrationPlanner::new(
            plan,
            SequentialExecutor,
            Arc::clone(&self.filesystem),
        ));
        self
    }

    /// Every extension the resolver knows about.
    pub fn available_extensions(&self) -> Vec<ExtensionHandle> {
        self.resolver.available()
    }

    /// Create (or, with `opts.update`, update) a project.
    #[instrument(
        skip_all,
        fields(
            project = %opts.project_path().display(),
            update = opts.update,
            pretend = opts.pretend
        )
    )]
    pub fn create_project(&self, opts: ScaffoldOpts) -> TrellisResult<ActionParams> {
        let opts = self.bootstrap_options(opts)?;
        let pipeline = self.build_pipeline(&opts)?;
        info!(actions = ?pipeline.names(), "Pipeline assembled");
        SequentialExecutor.run(&pipeline, Structure::new(), opts)
    }

    /// Options that must be known before the pipeline is assembled: in update
    /// mode the persisted extensions have to be activated too.
    pub fn bootstrap_options(&self, opts: ScaffoldOpts) -> TrellisResult<ScaffoldOpts> {
        if !opts.update {
            return Ok(opts);
        }
        if !self.filesystem.is_dir(opts.project_path()) {
            return Err(ApplicationError::DirectoryDoesNotExist {
                path: opts.project_path().to_path_buf(),
            }
            .into());
        }
        project_info::merge_persisted(self.filesystem.as_ref(), self.resolver.as_ref(), opts)
    }

    /// Base actions with `opts.extensions` activated.
    pub fn build_pipeline(&self, opts: &ScaffoldOpts) -> TrellisResult<ActionList> {
        activate_extensions(self.base_actions()?, &opts.extensions)
    }

    /// The core pipeline, before any extension touched it.
    pub fn base_actions(&self) -> TrellisResult<ActionList> {
        Ok(ActionList::from_actions([
            self.get_default_options(),
            verify_options_consistency(),
            self.define_structure(),
            self.verify_project_dir(),
            self.version_migration(),
            self.create_structure(),
            report_done(),
        ])?)
    }

    // -------------------------------------------------------------------------
    // Base actions
    // -------------------------------------------------------------------------

    fn get_default_options(&self) -> Action {
        let fs = Arc::clone(&self.filesystem);
        let resolver = Arc::clone(&self.resolver);
        let defaults = self.defaults.clone();

        Action::new(names::GET_DEFAULT_OPTIONS, move |structure, opts: ScaffoldOpts| {
            let opts = if opts.update && fs.is_dir(opts.project_path()) {
                project_info::merge_persisted(fs.as_ref(), resolver.as_ref(), opts)?
            } else {
                opts
            };
            Ok((structure, apply_defaults(opts, &defaults)))
        })
    }

    fn define_structure(&self) -> Action {
        let template = Arc::clone(&self.template);
        Action::new(names::DEFINE_STRUCTURE, move |structure: Structure, opts| {
            let base = template.structure(&opts)?;
            Ok((structure.merge_tree(base), opts))
        })
    }

    fn verify_project_dir(&self) -> Action {
        let fs = Arc::clone(&self.filesystem);
        Action::new(names::VERIFY_PROJECT_DIR, move |structure, opts: ScaffoldOpts| {
            let path = opts.project_path();
            let exists = fs.exists(path);
            if opts.update && !exists {
                return Err(ApplicationError::DirectoryDoesNotExist {
                    path: path.to_path_buf(),
                }
                .into());
            }
            if !opts.update && !opts.force && exists {
                return Err(ApplicationError::DirectoryAlreadyExists {
                    path: path.to_path_buf(),
                }
                .into());
            }
            Ok((structure, opts))
        })
    }

    fn version_migration(&self) -> Action {
        let planner = Arc::clone(&self.planner);
        Action::new(names::VERSION_MIGRATION, move |structure, opts| {
            planner.migrate(structure, opts)
        })
    }

    fn create_structure(&self) -> Action {
        let fs = Arc::clone(&self.filesystem);
        Action::new(names::CREATE_STRUCTURE, move |structure, opts| {
            let report = materialize(fs.as_ref(), &structure, &opts)?;
            info!(files = report.len(), "Structure materialized");
            Ok((structure, opts))
        })
    }
}

fn verify_options_consistency() -> Action {
    Action::new(names::VERIFY_OPTIONS_CONSISTENCY, |structure, opts| {
        validator::validate_options(&opts)?;
        Ok((structure, opts))
    })
}

fn report_done() -> Action {
    Action::new(names::REPORT_DONE, |structure, opts: ScaffoldOpts| {
        let verb = if opts.update { "updated" } else { "created" };
        info!(
            project = opts.name.as_deref().unwrap_or_default(),
            path = %opts.project_path().display(),
            pretend = opts.pretend,
            "Project {verb}"
        );
        Ok((structure, opts))
    })
}

/// Fill every option still unset with a derived or configured default.
fn apply_defaults(mut opts: ScaffoldOpts, defaults: &ProjectDefaults) -> ScaffoldOpts {
    if opts.name.is_none() {
        opts.name = opts
            .project_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
    }
    if opts.package.is_none() {
        opts.package = opts.name.as_deref().map(to_snake_case);
    }

    fill(&mut opts.author, &defaults.author, DEFAULT_AUTHOR);
    fill(&mut opts.email, &defaults.email, DEFAULT_EMAIL);
    fill(&mut opts.license, &defaults.license, DEFAULT_LICENSE);
    if opts.version.is_none() {
        opts.version = Some(TOOL_VERSION);
    }
    opts
}

fn fill(slot: &mut Option<String>, configured: &Option<String>, builtin: &str) {
    if slot.is_none() {
        *slot = Some(configured.clone().unwrap_or_else(|| builtin.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::application::ports::{MockExtensionResolver, MockFilesystem, MockProjectTemplate};
    use crate::domain::{Anchor, DomainError, Extension};
    use crate::error::TrellisError;

    fn template() -> MockProjectTemplate {
        let mut template = MockProjectTemplate::new();
        template.expect_structure().returning(|opts| {
            Ok(Structure::new()
                .with_file("Cargo.toml", format!("[package]\nname = \"{}\"", opts.name.clone().unwrap_or_default()))
                .with_file("src/lib.rs", "// lib"))
        });
        template
    }

    fn service(fs: MockFilesystem) -> ScaffoldService {
        ScaffoldService::new(
            Arc::new(fs),
            Arc::new(template()),
            Arc::new(MockExtensionResolver::new()),
        )
    }

    fn writable_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_is_dir().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs
    }

    #[test]
    fn base_actions_are_in_order() {
        let list = service(MockFilesystem::new()).base_actions().unwrap();
        assert_eq!(
            list.names(),
            [
                "get_default_options",
                "verify_options_consistency",
                "define_structure",
                "verify_project_dir",
                "version_migration",
                "create_structure",
                "report_done",
            ]
        );
    }

    #[test]
    fn defaults_are_derived_from_path_and_config() {
        let defaults = ProjectDefaults {
            author: Some("Configured".into()),
            ..ProjectDefaults::default()
        };
        let opts = apply_defaults(ScaffoldOpts::new("/tmp/My Tool"), &defaults);
        assert_eq!(opts.name.as_deref(), Some("My Tool"));
        assert_eq!(opts.package.as_deref(), Some("my_tool"));
        assert_eq!(opts.author.as_deref(), Some("Configured"));
        assert_eq!(opts.email.as_deref(), Some(DEFAULT_EMAIL));
        assert_eq!(opts.license.as_deref(), Some(DEFAULT_LICENSE));
        assert_eq!(opts.version, Some(TOOL_VERSION));
    }

    #[test]
    fn pretend_and_real_runs_agree() {
        let real = service(writable_fs())
            .create_project(ScaffoldOpts::new("demo"))
            .unwrap();

        let mut dry_fs = MockFilesystem::new();
        dry_fs.expect_exists().returning(|_| false);
        dry_fs.expect_create_dir_all().never();
        dry_fs.expect_write_file().never();
        let (structure, opts) = service(dry_fs)
            .create_project(ScaffoldOpts::new("demo").pretend(true))
            .unwrap();

        assert_eq!(structure, real.0);
        assert_eq!(opts.pretend(false), real.1);
    }

    #[test]
    fn existing_directory_needs_force() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_write_file().never();

        let err = service(fs)
            .create_project(ScaffoldOpts::new("demo"))
            .unwrap_err();
        assert!(matches!(
            err.root_cause(),
            TrellisError::Application(ApplicationError::DirectoryAlreadyExists { .. })
        ));
    }

    #[test]
    fn update_of_missing_directory_fails_early() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| false);

        let err = service(fs)
            .create_project(ScaffoldOpts::new("demo").update(true))
            .unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Application(ApplicationError::DirectoryDoesNotExist { .. })
        ));
    }

    #[test]
    fn invalid_package_stops_before_anything_is_written() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().never();
        fs.expect_exists().never();

        let mut opts = ScaffoldOpts::new("demo");
        opts.package = Some("not-an-ident".into());
        let err = service(fs).create_project(opts).unwrap_err();

        match err {
            TrellisError::Application(ApplicationError::ActionExecution { action, source, .. }) => {
                assert_eq!(action, "verify_options_consistency");
                assert!(matches!(
                    *source,
                    TrellisError::Domain(DomainError::InvalidIdentifier { .. })
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[derive(Debug)]
    struct AddChangelog;

    impl Extension for AddChangelog {
        fn name(&self) -> &str {
            "changelog"
        }

        fn activate(&self, actions: ActionList) -> TrellisResult<ActionList> {
            let action = Action::new("add_changelog", |s: Structure, o| {
                Ok((s.with_file("CHANGELOG.md", "# Changelog"), o))
            });
            Ok(actions.register(action, Anchor::after(names::DEFINE_STRUCTURE))?)
        }
    }

    #[test]
    fn extensions_shape_the_pipeline() {
        let opts = ScaffoldOpts::new("demo").with_extension(AddChangelog);
        let svc = service(writable_fs());
        let pipeline = svc.build_pipeline(&opts).unwrap();
        assert_eq!(
            pipeline.position("add_changelog"),
            pipeline.position("define_structure").map(|p| p + 1)
        );

        let (structure, _) = svc.create_project(opts).unwrap();
        assert!(structure.contains("CHANGELOG.md"));
        assert!(structure.contains("src/lib.rs"));
    }
}
