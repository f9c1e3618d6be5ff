//! Keyed CRUD over the workflow collection.
//!
//! Every mutation reads the whole collection from the backend, changes it in
//! memory, writes the whole collection back, and then bumps the refresh
//! revision. Mutating methods take `&mut self`, so a store has at most one
//! mutation in flight.

use super::{GroupSnapshot, Workflow, WorkflowCollection};
use crate::traits::KeyValueStore;
use anyhow::Result;
use tabshift_config::WORKFLOWS_KEY;
use tokio::sync::watch;

/// Result of removing a tab from a saved workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTabOutcome {
    /// No such workflow, group, or tab
    NotFound,
    /// Tabs were removed and the group still has others
    TabsRemoved(usize),
    /// The group became empty and was removed
    GroupRemoved,
    /// The workflow lost its last group and was removed
    WorkflowRemoved,
}

pub struct WorkflowStore<S> {
    backend: S,
    key: String,
    revision: watch::Sender<u64>,
}

impl<S: KeyValueStore> WorkflowStore<S> {
    /// Store persisting under the default `workflows` key.
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, WORKFLOWS_KEY)
    }

    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            backend,
            key: key.into(),
            revision,
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Receiver that changes every time the stored collection changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current refresh revision.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Signal listeners to recompute their view of the collection.
    pub fn refresh(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Snapshot of the whole collection.
    pub async fn load(&self) -> Result<WorkflowCollection> {
        self.backend.read(&self.key).await
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        Ok(self.load().await?.names())
    }

    pub async fn get(&self, name: &str) -> Result<Option<Workflow>> {
        Ok(self.load().await?.workflow(name))
    }

    pub async fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.load().await?.contains(name))
    }

    /// Store `groups` under `name`, replacing any existing workflow.
    pub async fn save(&mut self, name: &str, groups: Vec<GroupSnapshot>) -> Result<()> {
        let group_count = groups.len();
        self.mutate(|collection| {
            collection.insert(name, groups);
            ((), true)
        })
        .await?;
        log::info!("Saved workflow '{}' with {} groups", name, group_count);
        Ok(())
    }

    /// Remove a workflow. Returns `false` if it did not exist.
    pub async fn delete(&mut self, name: &str) -> Result<bool> {
        let removed = self
            .mutate(|collection| {
                let removed = collection.remove(name).is_some();
                (removed, removed)
            })
            .await?;
        if removed {
            log::info!("Deleted workflow '{}'", name);
        }
        Ok(removed)
    }

    /// Rename a workflow.
    ///
    /// No-op (returns `false`) if the names are equal, `new_name` is empty,
    /// or `old_name` does not exist. An existing `new_name` is overwritten.
    pub async fn rename(&mut self, old_name: &str, new_name: &str) -> Result<bool> {
        if old_name == new_name || new_name.is_empty() {
            return Ok(false);
        }
        let renamed = self
            .mutate(|collection| {
                let renamed = collection.rename(old_name, new_name);
                (renamed, renamed)
            })
            .await?;
        if renamed {
            log::info!("Renamed workflow '{}' -> '{}'", old_name, new_name);
        }
        Ok(renamed)
    }

    /// Remove every tab labeled `tab_label` from the group in `view_column`.
    ///
    /// An emptied group is removed; a workflow left without groups is removed.
    pub async fn delete_tab(
        &mut self,
        workflow_name: &str,
        view_column: u32,
        tab_label: &str,
    ) -> Result<DeleteTabOutcome> {
        self.mutate(|collection| {
            let outcome = remove_tab(collection, workflow_name, view_column, tab_label);
            (outcome, outcome != DeleteTabOutcome::NotFound)
        })
        .await
    }

    /// Read, change, and write back the collection.
    ///
    /// `op` returns its result and whether it changed anything; unchanged
    /// collections are neither written nor signalled.
    async fn mutate<T>(&mut self, op: impl FnOnce(&mut WorkflowCollection) -> (T, bool)) -> Result<T> {
        let mut collection = self.backend.read(&self.key).await?;
        let (result, changed) = op(&mut collection);
        if changed {
            self.backend.write(&self.key, &collection).await?;
            self.refresh();
        }
        Ok(result)
    }
}

fn remove_tab(
    collection: &mut WorkflowCollection,
    workflow_name: &str,
    view_column: u32,
    tab_label: &str,
) -> DeleteTabOutcome {
    let Some(groups) = collection.get_mut(workflow_name) else {
        return DeleteTabOutcome::NotFound;
    };
    let Some(index) = groups.iter().position(|g| g.view_column == view_column) else {
        return DeleteTabOutcome::NotFound;
    };

    let group = &mut groups[index];
    let before = group.tabs.len();
    group.tabs.retain(|t| t.label != tab_label);
    let removed = before - group.tabs.len();
    if removed == 0 {
        return DeleteTabOutcome::NotFound;
    }
    if !group.tabs.is_empty() {
        return DeleteTabOutcome::TabsRemoved(removed);
    }

    groups.remove(index);
    if !groups.is_empty() {
        return DeleteTabOutcome::GroupRemoved;
    }

    collection.remove(workflow_name);
    DeleteTabOutcome::WorkflowRemoved
}
