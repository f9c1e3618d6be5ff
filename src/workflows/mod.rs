//! Named workflows: capture, merge, restore, and persistence of tab layouts.
//!
//! A workflow is a named snapshot of the editor's tab groups. The data types
//! are defined in `tabshift-config` and re-exported here; this module adds
//! the collection that maps names to workflows, and the engines that operate
//! on plain snapshot values:
//!
//! - [`capture`] reads the live layout into snapshots
//! - [`merge`] folds a new capture into a saved workflow without duplicates
//! - [`restore`] replays a workflow onto the host, tab by tab
//! - [`storage`] / [`store`] persist the collection behind a key-value backend

pub mod capture;
pub mod merge;
pub mod restore;
pub mod storage;
pub mod store;

pub use tabshift_config::snapshot_types::{GroupSnapshot, TabKind, TabSnapshot};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A named workflow, detached from the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub name: String,
    pub groups: Vec<GroupSnapshot>,
}

/// All saved workflows, keyed by name (case-sensitive).
///
/// Names keep insertion order. Serialized as a YAML/JSON mapping from name to
/// the ordered list of groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowCollection {
    /// Groups indexed by workflow name
    workflows: HashMap<String, Vec<GroupSnapshot>>,

    /// Workflow names in display order
    order: Vec<String>,
}

impl WorkflowCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a workflow. A replaced workflow keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, groups: Vec<GroupSnapshot>) {
        let name = name.into();
        if !self.workflows.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.workflows.insert(name, groups);
    }

    pub fn get(&self, name: &str) -> Option<&[GroupSnapshot]> {
        self.workflows.get(name).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<GroupSnapshot>> {
        self.workflows.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.workflows.contains_key(name)
    }

    /// Remove a workflow by name.
    pub fn remove(&mut self, name: &str) -> Option<Vec<GroupSnapshot>> {
        self.order.retain(|n| n != name);
        self.workflows.remove(name)
    }

    /// Move the workflow at `old` to `new`, keeping its position.
    ///
    /// Returns `false` (and changes nothing) when the names are equal, `new`
    /// is empty, or `old` does not exist. An existing workflow named `new` is
    /// replaced without warning.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if old == new || new.is_empty() {
            return false;
        }
        let Some(groups) = self.workflows.remove(old) else {
            return false;
        };

        if self.workflows.remove(new).is_some() {
            log::warn!("Rename of '{}' replaced existing workflow '{}'", old, new);
            self.order.retain(|n| n != new);
        }
        if let Some(slot) = self.order.iter_mut().find(|n| n.as_str() == old) {
            *slot = new.to_string();
        }
        self.workflows.insert(new.to_string(), groups);
        true
    }

    /// Workflow names in display order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Workflows in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[GroupSnapshot])> {
        self.order.iter().filter_map(|name| {
            self.workflows
                .get(name)
                .map(|groups| (name.as_str(), groups.as_slice()))
        })
    }

    /// Clone a workflow out of the collection.
    pub fn workflow(&self, name: &str) -> Option<Workflow> {
        self.workflows.get(name).map(|groups| Workflow {
            name: name.to_string(),
            groups: groups.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

impl Serialize for WorkflowCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, groups) in self.iter() {
            map.serialize_entry(name, groups)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WorkflowCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = WorkflowCollection;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from workflow name to a list of tab groups")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut collection = WorkflowCollection::new();
                while let Some((name, groups)) =
                    access.next_entry::<String, Vec<GroupSnapshot>>()?
                {
                    collection.insert(name, groups);
                }
                Ok(collection)
            }

            // `~` / `null` is what an emptied store looks like on disk
            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(WorkflowCollection::new())
            }
        }

        deserializer.deserialize_map(CollectionVisitor)
    }
}
