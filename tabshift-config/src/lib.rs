//! Snapshot model and configuration for tabshift.
//!
//! This crate holds the pure data side of the workspace:
//!
//! - Tab / group snapshot types persisted for each saved workflow
//! - User configuration (YAML) with defaults and atomic save
//! - Typed configuration errors

pub mod config;
pub mod error;
pub mod snapshot_types;
pub mod types;

pub use config::{Config, WORKFLOWS_KEY};
pub use error::ConfigError;
pub use snapshot_types::{GroupSnapshot, TabKind, TabSnapshot, deserialize_view_column};
pub use types::{LogLevel, SpecialTabAction, default_special_tabs, special_tab_action};
