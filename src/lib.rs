// Library exports for testing and embedding in other hosts
//
// The engines in `workflows` operate on plain snapshot values and reach the
// outside world only through the service traits in `traits`. `commands`
// composes them into user-facing operations; `cli` and `host` are the
// terminal front end.

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod cli;
pub mod commands;
pub mod host;
pub mod traits;
pub mod workflow_tree;
pub mod workflows;

pub use commands::{Command, CommandOutcome, WorkflowCommands};
pub use tabshift_config::Config;
pub use workflows::store::WorkflowStore;
pub use workflows::{GroupSnapshot, TabKind, TabSnapshot, Workflow, WorkflowCollection};
