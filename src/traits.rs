//! Service contracts between the workflow engines and the host.
//!
//! The engines never talk to an editor, a dialog, or a disk directly. They go
//! through these traits so the same code drives a real editor host, the
//! file-backed CLI host in [`crate::host`], and the recording fakes used in
//! tests.
//!
//! All services are `async`: every call is a suspension point on a
//! single-threaded cooperative runtime. Nothing here requires `Send`.

use crate::workflows::WorkflowCollection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Live window state ───────────────────────────────────────────────────────

/// What kind of editor input backs a live tab.
///
/// Capture classifies tabs by matching on this: the three resource-bearing
/// variants become File snapshots, `Opaque` (and a `Custom` input without a
/// uri) becomes an Other snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TabInput {
    /// Plain text document
    Text { uri: String },
    /// Notebook document
    Notebook {
        uri: String,
        #[serde(default)]
        notebook_type: String,
    },
    /// Custom editor, diff view, webview, ... that may expose a resource uri
    Custom {
        #[serde(default)]
        uri: Option<String>,
        #[serde(default)]
        view_type: String,
    },
    /// Settings, welcome page, terminal-in-editor and anything else
    Opaque,
}

impl TabInput {
    /// The backing resource identifier, if this input has a non-empty one.
    pub fn resource_uri(&self) -> Option<&str> {
        let uri = match self {
            TabInput::Text { uri } | TabInput::Notebook { uri, .. } => Some(uri.as_str()),
            TabInput::Custom { uri, .. } => uri.as_deref(),
            TabInput::Opaque => None,
        };
        uri.filter(|u| !u.is_empty())
    }
}

/// One tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveTab {
    pub input: TabInput,
    pub label: String,
    #[serde(default)]
    pub is_preview: bool,
    #[serde(default)]
    pub is_active: bool,
}

/// One editor column as reported by the host, tabs in left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveGroup {
    #[serde(deserialize_with = "tabshift_config::deserialize_view_column")]
    pub view_column: u32,
    #[serde(default)]
    pub tabs: Vec<LiveTab>,
}

/// How a resource should be shown when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub view_column: u32,
    /// Keep input focus where it is
    pub preserve_focus: bool,
    /// `None` leaves the decision to the host's preview setting
    pub preview: Option<bool>,
}

// ── Errors ──────────────────────────────────────────────────────────────────

/// Failure reported by the host for a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("unsupported by host: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Other(String),
}

// ── WindowLayoutService ─────────────────────────────────────────────────────

/// Enumerates and manipulates the host's editor tabs.
#[allow(async_fn_in_trait)]
pub trait WindowLayoutService {
    /// All editor groups in column order.
    async fn list_groups(&self) -> Vec<LiveGroup>;

    /// Open `uri` as a tab in the requested column.
    async fn open_resource(&self, uri: &str, options: OpenOptions) -> Result<(), HostError>;

    /// Close every editor tab in every group.
    async fn close_all_tabs(&self) -> Result<(), HostError>;

    /// Run a host action by id (e.g. open the settings view).
    async fn run_action(&self, action: &str) -> Result<(), HostError>;

    /// Persist all dirty documents.
    async fn save_all_documents(&self) -> Result<(), HostError>;
}

// ── UserInteraction ─────────────────────────────────────────────────────────

/// Prompts, confirmations, pickers, and notifications.
///
/// Dismissing a prompt or picker yields `None`; declining a confirmation
/// yields `false`.
#[allow(async_fn_in_trait)]
pub trait UserInteraction {
    /// Free-text input pre-filled with `default_value`.
    async fn prompt_text(&self, prompt: &str, default_value: &str) -> Option<String>;

    /// Modal confirmation. Returns `true` only if `action_label` was chosen.
    async fn confirm(&self, message: &str, action_label: &str) -> bool;

    /// Single selection from `items`.
    async fn pick(&self, items: &[String], placeholder: &str) -> Option<String>;

    fn show_info(&self, message: &str);

    fn show_warning(&self, message: &str);
}

// ── KeyValueStore ───────────────────────────────────────────────────────────

/// Keyed persistence of whole workflow collections.
///
/// Reading a key that was never written yields an empty collection.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn read(&self, key: &str) -> anyhow::Result<WorkflowCollection>;

    async fn write(&self, key: &str, collection: &WorkflowCollection) -> anyhow::Result<()>;
}
