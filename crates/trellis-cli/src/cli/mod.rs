//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.
//!
//! Extension flags (`--no-cli`, `--github-actions`, ...) are not declared
//! statically: [`command`] adds one flag per known extension to `new`, and
//! [`parse_from`] reads them back.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Args, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use trellis_core::domain::ExtensionHandle;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

const EXTENSIONS_HEADING: &str = "Extensions";

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "trellis",
    bin_name = "trellis",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scaffold Rust projects and keep them up to date",
    long_about = "Trellis generates Rust projects from composable actions and \
                  migrates projects it generated earlier to the current layout.",
    after_help = "EXAMPLES:\n\
        \x20 trellis new my-tool --github-actions\n\
        \x20 trellis new libs/parser --no-cli --license Apache-2.0\n\
        \x20 trellis update my-tool --pretend\n\
        \x20 trellis completions bash > /usr/share/bash-completion/completions/trellis",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Parsed invocation: the derived arguments plus the extension flags that
/// were set on `new`, in declaration order.
#[derive(Debug)]
pub struct Invocation {
    pub cli: Cli,
    pub extensions: Vec<String>,
}

/// The full command, with one flag per extension added to `new`.
pub fn command(extensions: &[ExtensionHandle]) -> clap::Command {
    Cli::command().mut_subcommand("new", |new| {
        extensions.iter().fold(new, |cmd, ext| {
            cmd.arg(
                Arg::new(ext.name().to_string())
                    .long(ext.name().to_string())
                    .action(ArgAction::SetTrue)
                    .help(ext.description().to_string())
                    .help_heading(EXTENSIONS_HEADING),
            )
        })
    })
}

/// Parse `args` against [`command`].
pub fn parse_from<I, T>(args: I, extensions: &[ExtensionHandle]) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(extensions).try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    let enabled = matches
        .subcommand_matches("new")
        .map(|sub| {
            extensions
                .iter()
                .map(|ext| ext.name())
                .filter(|name| sub.get_flag(name))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Ok(Invocation {
        cli,
        extensions: enabled,
    })
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 trellis new my-tool\n\
            \x20 trellis new my-tool --github-actions --author 'Jane Doe'\n\
            \x20 trellis new my-lib --no-cli --pretend"
    )]
    New(NewArgs),

    /// Migrate an existing project to this version of trellis.
    #[command(
        visible_alias = "up",
        about = "Update a project generated by trellis",
        after_help = "EXAMPLES:\n\
            \x20 trellis update\n\
            \x20 trellis update ../my-tool --pretend"
    )]
    Update(UpdateArgs),

    /// List available extensions.
    #[command(
        visible_alias = "ls",
        about = "List available extensions",
        after_help = "EXAMPLES:\n\
            \x20 trellis extensions\n\
            \x20 trellis extensions --format json"
    )]
    Extensions(ExtensionsArgs),

    /// Initialise a Trellis configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 trellis init                   # default location\n\
            \x20 trellis --config ./t.toml init # explicit file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 trellis completions bash > ~/.local/share/bash-completion/completions/trellis\n\
            \x20 trellis completions zsh  > ~/.zfunc/_trellis\n\
            \x20 trellis completions fish > ~/.config/fish/completions/trellis.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Trellis configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 trellis config get defaults.author\n\
            \x20 trellis config list\n\
            \x20 trellis config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `trellis new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Where to create the project. Relative paths are resolved against the
    /// current directory; the last segment is the default project name.
    #[arg(value_name = "PATH", help = "Project directory")]
    pub path: PathBuf,

    #[arg(long = "name", value_name = "NAME", help = "Project name (default: directory name)")]
    pub name: Option<String>,

    #[arg(
        long = "package",
        value_name = "IDENT",
        help = "Library crate name (default: snake_case project name)"
    )]
    pub package: Option<String>,

    #[arg(long = "author", value_name = "NAME", help = "Author name")]
    pub author: Option<String>,

    #[arg(long = "email", value_name = "EMAIL", help = "Author email")]
    pub email: Option<String>,

    #[arg(long = "license", value_name = "SPDX", help = "License identifier")]
    pub license: Option<String>,

    #[arg(long = "description", value_name = "TEXT", help = "One-line description")]
    pub description: Option<String>,

    /// Generate into an existing directory.
    #[arg(long = "force", help = "Generate into an existing directory")]
    pub force: bool,

    /// Show what would be written without touching the disk.
    #[arg(
        long = "pretend",
        visible_alias = "dry-run",
        help = "Show what would be created without creating"
    )]
    pub pretend: bool,
}

// ── update ────────────────────────────────────────────────────────────────────

/// Arguments for `trellis update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(value_name = "PATH", default_value = ".", help = "Project directory")]
    pub path: PathBuf,

    #[arg(long = "force", help = "Continue even where the update would refuse")]
    pub force: bool,

    #[arg(
        long = "pretend",
        visible_alias = "dry-run",
        help = "Show what would change without changing it"
    )]
    pub pretend: bool,
}

// ── extensions ────────────────────────────────────────────────────────────────

/// Arguments for `trellis extensions`.
#[derive(Debug, Args)]
pub struct ExtensionsArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `extensions` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `trellis init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `trellis completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `trellis config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.author`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use trellis_core::{domain::ActionList, domain::Extension, error::TrellisResult};

    use super::*;

    #[derive(Debug)]
    struct Flag(&'static str);

    impl Extension for Flag {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test flag"
        }

        fn activate(&self, actions: ActionList) -> TrellisResult<ActionList> {
            Ok(actions)
        }
    }

    fn extensions() -> Vec<ExtensionHandle> {
        vec![Arc::new(Flag("no-cli")), Arc::new(Flag("github-actions"))]
    }

    #[test]
    fn verify_cli_structure() {
        command(&extensions()).debug_assert();
    }

    #[test]
    fn parse_new_command() {
        let inv = parse_from(
            ["trellis", "new", "my-project", "--author", "Jane", "--pretend"],
            &extensions(),
        )
        .unwrap();
        match inv.cli.command {
            Commands::New(args) => {
                assert_eq!(args.path, PathBuf::from("my-project"));
                assert_eq!(args.author.as_deref(), Some("Jane"));
                assert!(args.pretend);
                assert!(!args.force);
            }
            other => panic!("expected New command, got {other:?}"),
        }
        assert!(inv.extensions.is_empty());
    }

    #[test]
    fn extension_flags_are_collected_in_declaration_order() {
        let inv = parse_from(
            ["trellis", "new", "x", "--github-actions", "--no-cli"],
            &extensions(),
        )
        .unwrap();
        assert_eq!(inv.extensions, ["no-cli", "github-actions"]);
    }

    #[test]
    fn unknown_extension_flag_is_rejected() {
        assert!(parse_from(["trellis", "new", "x", "--docker"], &extensions()).is_err());
    }

    #[test]
    fn extension_flags_belong_to_new_only() {
        assert!(parse_from(["trellis", "update", "--no-cli"], &extensions()).is_err());
    }

    #[test]
    fn dry_run_alias() {
        let inv = parse_from(["trellis", "update", "p", "--dry-run"], &extensions()).unwrap();
        assert!(matches!(inv.cli.command, Commands::Update(UpdateArgs { pretend: true, .. })));
    }

    #[test]
    fn update_defaults_to_current_directory() {
        let inv = parse_from(["trellis", "update"], &extensions()).unwrap();
        match inv.cli.command {
            Commands::Update(args) => assert_eq!(args.path, PathBuf::from(".")),
            other => panic!("expected Update command, got {other:?}"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = parse_from(["trellis", "--quiet", "--verbose", "extensions"], &extensions());
        assert!(result.is_err());
    }
}
