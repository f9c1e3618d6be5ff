//! Capture the live editor layout into workflow snapshots

use super::{GroupSnapshot, TabSnapshot};
use crate::traits::{LiveGroup, LiveTab, WindowLayoutService};

/// Snapshot one live tab. A tab without a resource uri becomes an Other tab.
///
/// The host's uri string is stored as given; tab identity is an exact
/// string match.
pub fn capture_tab(tab: &LiveTab) -> TabSnapshot {
    match tab.input.resource_uri() {
        Some(uri) => {
            crate::debug_log!("CAPTURE", "Found tab: {}", uri);
            TabSnapshot::file(uri, tab.label.clone(), tab.is_preview)
        }
        None => {
            crate::debug_log!("CAPTURE", "Found special tab: {}", tab.label);
            TabSnapshot::other(tab.label.clone(), tab.is_preview)
        }
    }
}

/// Snapshot a list of live groups.
///
/// Group and tab order are preserved. Groups that end up with no tabs are
/// dropped. A group's `active_tab_uri` is the uri of its active tab, or
/// `None` when the active tab has no uri.
pub fn capture_groups(live: &[LiveGroup]) -> Vec<GroupSnapshot> {
    crate::debug_info!("CAPTURE", "Found {} tab groups", live.len());

    let mut groups = Vec::new();
    for group in live {
        crate::debug_log!(
            "CAPTURE",
            "Processing group with view column {} and {} tabs",
            group.view_column,
            group.tabs.len()
        );

        let mut tabs = Vec::with_capacity(group.tabs.len());
        let mut active_tab_uri = None;
        for tab in &group.tabs {
            let snapshot = capture_tab(tab);
            if tab.is_active && snapshot.uri.is_some() {
                active_tab_uri = snapshot.uri.clone();
            }
            tabs.push(snapshot);
        }

        if tabs.is_empty() {
            continue;
        }
        crate::debug_log!("CAPTURE", "Added group to workflow with {} tabs", tabs.len());
        groups.push(GroupSnapshot {
            view_column: group.view_column,
            tabs,
            active_tab_uri,
        });
    }
    groups
}

/// Capture the host's current layout.
pub async fn capture_layout<W: WindowLayoutService>(host: &W) -> Vec<GroupSnapshot> {
    let live = host.list_groups().await;
    capture_groups(&live)
}
