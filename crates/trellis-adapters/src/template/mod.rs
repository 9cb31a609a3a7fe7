//! The project template shipped with Trellis.
//!
//! [`BuiltinTemplate`] produces the base tree for a small Rust crate with a
//! library, a CLI entry point and a test for it. Every file is rendered with
//! a [`RenderContext`] built from the options, and the generated `Cargo.toml`
//! is stamped with the project metadata that later updates read back.
//!
//! | File               | Modifier         |
//! |--------------------|------------------|
//! | `Cargo.toml`       | skip on update   |
//! | `README.md`        | no overwrite     |
//! | `LICENSE`          | no overwrite     |
//! | `.gitignore`       | no overwrite     |
//! | `src/lib.rs`       | skip on update   |
//! | `src/main.rs`      | skip on update   |
//! | `tests/cli.rs`     | skip on update   |

mod files;

use chrono::Datelike;
use tracing::{debug, instrument};

use trellis_core::{
    application::{TOOL_VERSION, ports::ProjectTemplate},
    domain::{FileOp, Manifest, Node, RenderContext, ScaffoldOpts, Structure, persisted_names},
    error::TrellisResult,
};

/// Description used when the user gave none.
pub const DEFAULT_DESCRIPTION: &str = "A Rust project scaffolded with Trellis";

/// Template compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplate;

impl BuiltinTemplate {
    pub fn new() -> Self {
        Self
    }

    /// Rendering context for `opts`, including the values only the adapter
    /// knows (`YEAR`) and the description fallback.
    pub fn context(opts: &ScaffoldOpts) -> RenderContext {
        let ctx = RenderContext::from_opts(opts)
            .with_variable("YEAR", chrono::Local::now().year().to_string());
        match opts.description.as_deref() {
            Some(_) => ctx,
            None => ctx.with_variable("DESCRIPTION", DEFAULT_DESCRIPTION),
        }
    }

    fn manifest(ctx: &RenderContext, opts: &ScaffoldOpts) -> TrellisResult<String> {
        let mut manifest = Manifest::parse(&ctx.render(files::CARGO_TOML))?;
        let version = opts.version.clone().unwrap_or(TOOL_VERSION);
        manifest.stamp(
            &version,
            opts.package.as_deref(),
            &persisted_names(&opts.extensions),
            &opts.extra,
        )?;
        Ok(manifest.to_string())
    }
}

impl ProjectTemplate for BuiltinTemplate {
    #[instrument(skip_all, fields(project = opts.name.as_deref().unwrap_or_default()))]
    fn structure(&self, opts: &ScaffoldOpts) -> TrellisResult<Structure> {
        let ctx = Self::context(opts);
        let license = match opts.license.as_deref() {
            Some("MIT") | None => files::LICENSE_MIT,
            Some(_) => files::LICENSE_NOTICE,
        };

        let render = |text: &str, op: FileOp| Node::file_with(ctx.render(text), op);
        let structure = Structure::new()
            .merge(
                "Cargo.toml",
                Node::file_with(Self::manifest(&ctx, opts)?, FileOp::SkipOnUpdate),
            )
            .merge("README.md", render(files::README, FileOp::NoOverwrite))
            .merge("LICENSE", render(license, FileOp::NoOverwrite))
            .merge(".gitignore", render(files::GITIGNORE, FileOp::NoOverwrite))
            .merge("src/lib.rs", render(files::LIB_RS, FileOp::SkipOnUpdate))
            .merge("src/main.rs", render(files::MAIN_RS, FileOp::SkipOnUpdate))
            .merge("tests/cli.rs", render(files::CLI_TEST_RS, FileOp::SkipOnUpdate));

        debug!(files = structure.files().len(), "Template rendered");
        Ok(structure)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use trellis_core::domain::{ActionList, Extension, Version};

    use super::*;

    fn opts() -> ScaffoldOpts {
        let mut opts = ScaffoldOpts::new("/work/My Tool");
        opts.name = Some("My Tool".into());
        opts.package = Some("my_tool".into());
        opts.author = Some("Jane Doe".into());
        opts.email = Some("jane@example.com".into());
        opts.license = Some("MIT".into());
        opts
    }

    fn text(structure: &Structure, path: &'static str) -> String {
        structure
            .get(path)
            .and_then(Node::as_file)
            .map(|f| f.text().to_string())
            .unwrap_or_else(|| panic!("{path} missing"))
    }

    #[derive(Debug)]
    struct Ephemeral;

    impl Extension for Ephemeral {
        fn name(&self) -> &str {
            "ephemeral"
        }

        fn persist(&self) -> bool {
            false
        }

        fn activate(&self, actions: ActionList) -> TrellisResult<ActionList> {
            Ok(actions)
        }
    }

    #[derive(Debug)]
    struct Kept;

    impl Extension for Kept {
        fn name(&self) -> &str {
            "kept"
        }

        fn activate(&self, actions: ActionList) -> TrellisResult<ActionList> {
            Ok(actions)
        }
    }

    #[test]
    fn tree_has_every_file() {
        let structure = BuiltinTemplate.structure(&opts()).unwrap();
        let paths: Vec<String> = structure
            .files()
            .into_iter()
            .map(|(p, _)| p.to_string())
            .collect();
        assert_eq!(
            paths,
            [
                "Cargo.toml",
                "README.md",
                "LICENSE",
                ".gitignore",
                "src/lib.rs",
                "src/main.rs",
                "tests/cli.rs",
            ]
        );
    }

    #[test]
    fn modifiers_follow_file_kind() {
        let structure = BuiltinTemplate.structure(&opts()).unwrap();
        let op = |path: &'static str| structure.get(path).and_then(Node::as_file).map(|f| f.op());
        assert_eq!(op("Cargo.toml"), Some(FileOp::SkipOnUpdate));
        assert_eq!(op("README.md"), Some(FileOp::NoOverwrite));
        assert_eq!(op("src/main.rs"), Some(FileOp::SkipOnUpdate));
    }

    #[test]
    fn manifest_is_rendered_and_stamped() {
        let mut o = opts().with_extension(Kept).with_extension(Ephemeral);
        o.version = Some(Version::new(1, 0, 0));
        o.set_extra("kept_flavour", "sour");

        let structure = BuiltinTemplate.structure(&o).unwrap();
        let manifest = Manifest::parse(&text(&structure, "Cargo.toml")).unwrap();

        assert_eq!(manifest.package_str("name"), Some("my-tool"));
        assert_eq!(manifest.package_authors(), ["Jane Doe <jane@example.com>"]);
        assert_eq!(manifest.package_str("description"), Some(DEFAULT_DESCRIPTION));
        assert_eq!(manifest.recorded_version().unwrap(), Some(Version::new(1, 0, 0)));
        assert_eq!(manifest.recorded_package(), Some("my_tool"));
        assert_eq!(manifest.persisted_extensions(), ["kept"]);
        assert_eq!(
            manifest.metadata_extras().get("kept_flavour"),
            Some(&serde_json::Value::from("sour"))
        );
        assert!(manifest.has_bin_targets());
        assert_eq!(manifest.dependency_names("dependencies"), ["anyhow"]);
    }

    #[test]
    fn sources_use_the_package_name() {
        let structure = BuiltinTemplate.structure(&opts()).unwrap();
        assert!(text(&structure, "src/main.rs").contains("my_tool::greeting()"));
        assert!(text(&structure, "tests/cli.rs").contains("CARGO_BIN_EXE_my-tool"));
        assert!(text(&structure, "README.md").starts_with("# My Tool"));
    }

    #[test]
    fn license_text_depends_on_license() {
        let mit = BuiltinTemplate.structure(&opts()).unwrap();
        assert!(text(&mit, "LICENSE").starts_with("MIT License"));

        let mut other = opts();
        other.license = Some("Apache-2.0".into());
        let structure = BuiltinTemplate.structure(&other).unwrap();
        let license = text(&structure, "LICENSE");
        assert!(license.contains("Apache-2.0"));
        assert!(license.contains("Jane Doe"));
    }

    #[test]
    fn explicit_description_wins() {
        let mut o = opts();
        o.description = Some("Does things".into());
        let ctx = BuiltinTemplate::context(&o);
        assert_eq!(ctx.get("DESCRIPTION"), Some("Does things"));
        assert!(ctx.get("YEAR").is_some());
    }

    #[test]
    fn usable_through_the_port() {
        let template: Arc<dyn ProjectTemplate> = Arc::new(BuiltinTemplate::new());
        assert!(template.structure(&opts()).unwrap().contains("src/lib.rs"));
    }
}
