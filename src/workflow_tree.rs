//! Tree projection of the saved workflows for display.
//!
//! Three levels: workflow -> group -> tab. Nothing here is cached; every call
//! recomputes from the collection snapshot it is given, so a consumer only
//! needs to re-query after the store's refresh revision changes.

use crate::workflows::{GroupSnapshot, TabSnapshot, WorkflowCollection};
use serde::Serialize;
use std::path::PathBuf;
use url::Url;

/// Context value attached to workflow nodes (used by menus to target them)
pub const WORKFLOW_CONTEXT: &str = "session";
/// Context value attached to tab nodes
pub const TAB_CONTEXT: &str = "tab";
/// Label and tooltip marker for tabs without a resource
pub const SPECIAL_TAB: &str = "Special Tab";

/// One node of the workflow tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Workflow {
        name: String,
    },
    Group {
        workflow: String,
        group: GroupSnapshot,
    },
    Tab {
        workflow: String,
        view_column: u32,
        tab: TabSnapshot,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collapsible {
    None,
    Collapsed,
    Expanded,
}

/// Action bound to a tab node: open this tab in its column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTabCommand {
    pub tab: TabSnapshot,
    pub view_column: u32,
}

/// Everything a renderer needs to draw one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub collapsible: Collapsible,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_value: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<OpenTabCommand>,
}

/// Children of `parent`, or the root level when `parent` is `None`.
///
/// A workflow node whose name is no longer in the collection has no children.
pub fn children(collection: &WorkflowCollection, parent: Option<&TreeNode>) -> Vec<TreeNode> {
    match parent {
        None => collection
            .names()
            .into_iter()
            .map(|name| TreeNode::Workflow { name })
            .collect(),
        Some(TreeNode::Workflow { name }) => collection
            .get(name)
            .unwrap_or_default()
            .iter()
            .map(|group| TreeNode::Group {
                workflow: name.clone(),
                group: group.clone(),
            })
            .collect(),
        Some(TreeNode::Group { workflow, group }) => group
            .tabs
            .iter()
            .map(|tab| TreeNode::Tab {
                workflow: workflow.clone(),
                view_column: group.view_column,
                tab: tab.clone(),
            })
            .collect(),
        Some(TreeNode::Tab { .. }) => Vec::new(),
    }
}

impl TreeNode {
    pub fn tree_item(&self) -> TreeItem {
        match self {
            TreeNode::Workflow { name } => TreeItem {
                id: None,
                label: name.clone(),
                description: None,
                tooltip: None,
                collapsible: Collapsible::Collapsed,
                context_value: Some(WORKFLOW_CONTEXT),
                command: None,
            },
            TreeNode::Group { group, .. } => TreeItem {
                id: None,
                label: format!("Group {}", group.view_column),
                description: None,
                tooltip: Some(format!("{} tabs", group.tabs.len())),
                collapsible: Collapsible::Expanded,
                context_value: None,
                command: None,
            },
            TreeNode::Tab {
                workflow,
                view_column,
                tab,
            } => {
                let label = tab_display_label(tab);
                let (tooltip, description) = match resource_path(tab) {
                    Some(path) => (
                        path.display().to_string(),
                        path.parent()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default(),
                    ),
                    None => (SPECIAL_TAB.to_string(), SPECIAL_TAB.to_string()),
                };
                TreeItem {
                    id: Some(format!("{}-{}-{}", workflow, view_column, label)),
                    label,
                    description: Some(description),
                    tooltip: Some(tooltip),
                    collapsible: Collapsible::None,
                    context_value: Some(TAB_CONTEXT),
                    command: Some(OpenTabCommand {
                        tab: tab.clone(),
                        view_column: *view_column,
                    }),
                }
            }
        }
    }
}

/// Label shown for a tab: the file name for File tabs, the stored label otherwise.
pub fn tab_display_label(tab: &TabSnapshot) -> String {
    if !tab.is_file() {
        return tab.label.clone();
    }
    match resource_path(tab) {
        Some(path) => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .or_else(|| tab.uri.clone())
            .unwrap_or_else(|| tab.label.clone()),
        None => tab.label.clone(),
    }
}

/// File-system path behind a File tab's uri.
///
/// `file:` uris map to a local path; other schemes fall back to the uri
/// path, and unparseable identifiers are used verbatim.
fn resource_path(tab: &TabSnapshot) -> Option<PathBuf> {
    if !tab.is_file() {
        return None;
    }
    let raw = tab.uri.as_deref()?;
    let Ok(url) = Url::parse(raw) else {
        return Some(PathBuf::from(raw));
    };
    if let Ok(path) = url.to_file_path() {
        return Some(path);
    }
    if url.path().is_empty() {
        return Some(PathBuf::from(raw));
    }
    Some(PathBuf::from(url.path()))
}

/// Plain-text rendering of the fully expanded tree, one node per line.
pub fn render_tree(collection: &WorkflowCollection) -> String {
    let mut out = String::new();
    for workflow in children(collection, None) {
        render_node(collection, &workflow, 0, &mut out);
    }
    out
}

fn render_node(collection: &WorkflowCollection, node: &TreeNode, depth: usize, out: &mut String) {
    let item = node.tree_item();
    out.push_str(&"  ".repeat(depth));
    out.push_str(&item.label);
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("  ({})", description));
    }
    out.push('\n');
    for child in children(collection, Some(node)) {
        render_node(collection, &child, depth + 1, out);
    }
}
