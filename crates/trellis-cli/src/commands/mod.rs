//! One module per subcommand. Each exposes an `execute` function that turns
//! parsed arguments into calls on the core services.

pub mod completions;
pub mod config;
pub mod extensions;
pub mod init;
pub mod new;
pub mod update;
