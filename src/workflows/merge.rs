//! Merge a fresh capture into a saved workflow.
//!
//! Policy, applied per incoming group:
//!
//! 1. Find the saved group with the same `view_column`.
//! 2. If there is one, append each incoming tab unless a tab with the same
//!    uri is already there, then let the incoming `active_tab_uri` (if set)
//!    replace the saved one.
//! 3. Otherwise append the incoming group as a new group.
//!
//! Merging never removes tabs or groups. Tabs without a uri are never
//! treated as duplicates, so two Other tabs that share a label are both kept.

use super::GroupSnapshot;

/// Merge `incoming` into a copy of `existing`.
///
/// Neither input is modified; the result owns all of its data.
pub fn merge_groups(existing: &[GroupSnapshot], incoming: &[GroupSnapshot]) -> Vec<GroupSnapshot> {
    let mut merged = existing.to_vec();

    for new_group in incoming {
        let Some(group) = merged
            .iter_mut()
            .find(|g| g.view_column == new_group.view_column)
        else {
            crate::debug_log!(
                "MERGE",
                "Adding new group for view column {} ({} tabs)",
                new_group.view_column,
                new_group.tabs.len()
            );
            merged.push(new_group.clone());
            continue;
        };

        let mut added = 0usize;
        for tab in &new_group.tabs {
            if group.tabs.iter().any(|t| t.same_resource(tab)) {
                continue;
            }
            group.tabs.push(tab.clone());
            added += 1;
        }

        if new_group.active_tab_uri.is_some() {
            group.active_tab_uri = new_group.active_tab_uri.clone();
        }

        crate::debug_log!(
            "MERGE",
            "Merged {} new tabs into view column {}",
            added,
            group.view_column
        );
    }

    merged
}
