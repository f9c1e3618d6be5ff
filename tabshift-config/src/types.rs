//! Small configuration value types.

use serde::{Deserialize, Serialize};

/// Log level for the debug log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Host action replayed for a tab that has no resource uri.
///
/// Restore looks up an Other tab's label in this table and runs the matching
/// action. Labels with no entry are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTabAction {
    /// Tab label as captured (exact match)
    pub label: String,
    /// Host action identifier
    pub action: String,
}

impl SpecialTabAction {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

/// Action for the first entry whose label matches `label` exactly.
pub fn special_tab_action<'a>(table: &'a [SpecialTabAction], label: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|entry| entry.label == label)
        .map(|entry| entry.action.as_str())
}

/// Settings and Welcome, the two special tabs every host can reopen.
pub fn default_special_tabs() -> Vec<SpecialTabAction> {
    vec![
        SpecialTabAction::new("Settings", "workbench.action.openSettings"),
        SpecialTabAction::new("Welcome", "workbench.action.showWelcomePage"),
    ]
}
