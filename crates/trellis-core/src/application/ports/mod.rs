//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `trellis-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `ProjectTemplate`: The base project tree
//!   - `ExtensionResolver`: Turning persisted extension names back into extensions
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{ExtensionResolver, Filesystem, ProjectTemplate};

#[cfg(test)]
pub use output::{MockExtensionResolver, MockFilesystem, MockProjectTemplate};
