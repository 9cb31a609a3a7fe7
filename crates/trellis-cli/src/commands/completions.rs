//! Shell completion generation.

use clap_complete::{generate, shells};
use trellis_adapters::ExtensionRegistry;
use trellis_core::application::ExtensionResolver;

use crate::cli::{self, CompletionsArgs, Shell};

const BIN_NAME: &str = "trellis";

/// Print a completion script, extension flags included.
pub fn execute(args: CompletionsArgs) -> crate::error::CliResult<()> {
    let mut cmd = cli::command(&ExtensionRegistry::builtin().available());
    let out = &mut std::io::stdout();

    match args.shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, BIN_NAME, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, BIN_NAME, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, BIN_NAME, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, BIN_NAME, out),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, BIN_NAME, out),
    }

    Ok(())
}
