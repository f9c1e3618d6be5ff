//! Snapshot types for saved workflows.
//!
//! A workflow is an ordered list of [`GroupSnapshot`]s, one per editor column,
//! each holding the [`TabSnapshot`]s that were open in that column when the
//! layout was captured.
//!
//! # Serialization compatibility
//!
//! Field names are written in camelCase (`viewColumn`, `activeTabUri`,
//! `isPreview`) and the tab kind is stored under `type` as `file` / `other`,
//! so files written by earlier versions of the extension load unchanged.
//! There is no schema version field.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a 1-based editor column, rejecting 0.
pub fn deserialize_view_column<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let column = u32::deserialize(deserializer)?;
    if column == 0 {
        return Err(de::Error::invalid_value(
            Unexpected::Unsigned(0),
            &"a view column of 1 or more",
        ));
    }
    Ok(column)
}

/// Whether a tab is backed by a file-like resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    /// Text document, notebook, or any other input that exposes a resource uri
    File,
    /// Settings, welcome page, and anything else without a uri
    #[default]
    Other,
}

/// Snapshot of a single tab.
///
/// File tabs always carry a `uri`. Other tabs are identified only by `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    /// Backing resource identifier, exactly as the host reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Tab was open in preview (replaceable) mode
    #[serde(default)]
    pub is_preview: bool,

    /// Tab title as shown by the host
    #[serde(default)]
    pub label: String,

    #[serde(rename = "type", default)]
    pub kind: TabKind,
}

impl TabSnapshot {
    /// Snapshot of a tab backed by a resource.
    pub fn file(uri: impl Into<String>, label: impl Into<String>, is_preview: bool) -> Self {
        Self {
            uri: Some(uri.into()),
            is_preview,
            label: label.into(),
            kind: TabKind::File,
        }
    }

    /// Snapshot of a tab with no resource (settings, welcome page, webviews).
    pub fn other(label: impl Into<String>, is_preview: bool) -> Self {
        Self {
            uri: None,
            is_preview,
            label: label.into(),
            kind: TabKind::Other,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == TabKind::File
    }

    /// True when both tabs point at the same resource (exact string match).
    ///
    /// Tabs without a uri never match anything, including each other.
    pub fn same_resource(&self, other: &TabSnapshot) -> bool {
        match (&self.uri, &other.uri) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// The tabs open in one editor column, plus which one was active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    /// Editor split/column index (1-based)
    #[serde(deserialize_with = "deserialize_view_column")]
    pub view_column: u32,

    /// Tabs in capture order
    #[serde(default)]
    pub tabs: Vec<TabSnapshot>,

    /// Uri of the active tab, if the active tab had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_tab_uri: Option<String>,
}

impl GroupSnapshot {
    pub fn new(view_column: u32) -> Self {
        Self {
            view_column,
            tabs: Vec::new(),
            active_tab_uri: None,
        }
    }

    /// Find the tab whose uri equals `uri`.
    pub fn tab_by_uri(&self, uri: &str) -> Option<&TabSnapshot> {
        self.tabs.iter().find(|t| t.uri.as_deref() == Some(uri))
    }

    /// The tab referenced by `active_tab_uri`, if it is still present.
    pub fn active_tab(&self) -> Option<&TabSnapshot> {
        match self.active_tab_uri.as_deref() {
            Some(uri) if !uri.is_empty() => self.tab_by_uri(uri),
            _ => None,
        }
    }
}
