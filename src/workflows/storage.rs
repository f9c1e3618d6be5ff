//! Storage backends for workflow persistence
//!
//! The file backend keeps one YAML file per key, e.g.
//! `~/.config/tabshift/workflows.yaml` for the `workflows` key.

use super::WorkflowCollection;
use crate::traits::KeyValueStore;
use anyhow::{Context, Result, bail};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Load a workflow collection from a specific file
///
/// A missing or whitespace-only file is an empty collection. A file that
/// exists but cannot be parsed is an error.
pub fn load_workflows_from(path: &Path) -> Result<WorkflowCollection> {
    crate::debug_info!("STORE", "Loading workflows from {:?}", path);
    if !path.exists() {
        crate::debug_info!(
            "STORE",
            "No workflows file found at {:?}, starting with empty collection",
            path
        );
        return Ok(WorkflowCollection::new());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workflows from {:?}", path))?;

    if contents.trim().is_empty() {
        crate::debug_info!("STORE", "Workflows file is empty, starting with empty collection");
        return Ok(WorkflowCollection::new());
    }

    let collection: WorkflowCollection = serde_yaml_ng::from_str(&contents)
        .with_context(|| format!("Failed to parse workflows from {:?}", path))?;

    crate::debug_info!(
        "STORE",
        "Parsed {} workflows from {:?}",
        collection.len(),
        path
    );
    for (name, groups) in collection.iter() {
        crate::debug_log!("STORE", "  - {} ({} groups)", name, groups.len());
    }
    Ok(collection)
}

/// Save a workflow collection to a specific file
pub fn save_workflows_to(collection: &WorkflowCollection, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create storage directory {:?}", parent))?;
    }

    let contents = serde_yaml_ng::to_string(collection).context("Failed to serialize workflows")?;

    // Write to a sibling temp file and rename so a crash never leaves half a file
    let temp_path = path.with_extension("yaml.tmp");
    std::fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write workflows to {:?}", temp_path))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move workflows into place at {:?}", path))?;

    log::info!("Saved {} workflows to {:?}", collection.len(), path);
    Ok(())
}

/// One YAML file per key inside a directory.
#[derive(Debug, Clone)]
pub struct YamlFileStore {
    dir: PathBuf,
}

impl YamlFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`. Keys must be plain file stems.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            bail!("Invalid storage key {:?}", key);
        }
        Ok(self.dir.join(format!("{key}.yaml")))
    }
}

impl KeyValueStore for YamlFileStore {
    async fn read(&self, key: &str) -> Result<WorkflowCollection> {
        load_workflows_from(&self.path_for(key)?)
    }

    async fn write(&self, key: &str, collection: &WorkflowCollection) -> Result<()> {
        save_workflows_to(collection, &self.path_for(key)?)
    }
}

/// Process-local store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, WorkflowCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of what is currently stored under `key`.
    pub fn snapshot(&self, key: &str) -> Option<WorkflowCollection> {
        self.entries.lock().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<WorkflowCollection> {
        Ok(self.entries.lock().get(key).cloned().unwrap_or_default())
    }

    async fn write(&self, key: &str, collection: &WorkflowCollection) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), collection.clone());
        Ok(())
    }
}
