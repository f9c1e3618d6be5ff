//! Workflow store behavior against the YAML file backend.

use tabshift::traits::KeyValueStore;
use tabshift::workflows::storage::YamlFileStore;
use tabshift::workflows::store::{DeleteTabOutcome, WorkflowStore};
use tabshift::{GroupSnapshot, TabSnapshot, WorkflowCollection};
use tempfile::tempdir;

fn group(view_column: u32, uris: &[&str], active: Option<&str>) -> GroupSnapshot {
    GroupSnapshot {
        view_column,
        tabs: uris
            .iter()
            .map(|uri| TabSnapshot::file(*uri, uri.rsplit('/').next().unwrap_or(uri), false))
            .collect(),
        active_tab_uri: active.map(str::to_string),
    }
}

#[tokio::test]
async fn test_workflows_persist_across_store_instances() {
    let temp = tempdir().unwrap();
    {
        let mut store = WorkflowStore::new(YamlFileStore::new(temp.path()));
        store
            .save("Focus", vec![group(1, &["file:///a.txt"], Some("file:///a.txt"))])
            .await
            .unwrap();
        store.save("Review", vec![group(2, &["file:///b.txt"], None)]).await.unwrap();
    }

    let store = WorkflowStore::new(YamlFileStore::new(temp.path()));
    assert_eq!(store.list().await.unwrap(), vec!["Focus", "Review"]);
    let focus = store.get("Focus").await.unwrap().unwrap();
    assert_eq!(focus.groups[0].active_tab_uri.as_deref(), Some("file:///a.txt"));
}

#[tokio::test]
async fn test_on_disk_layout_uses_camel_case_fields() {
    let temp = tempdir().unwrap();
    let mut store = WorkflowStore::new(YamlFileStore::new(temp.path()));
    store
        .save(
            "Focus",
            vec![GroupSnapshot {
                view_column: 1,
                tabs: vec![
                    TabSnapshot::file("file:///a.txt", "a.txt", true),
                    TabSnapshot::other("Settings", false),
                ],
                active_tab_uri: Some("file:///a.txt".to_string()),
            }],
        )
        .await
        .unwrap();

    let yaml = std::fs::read_to_string(temp.path().join("workflows.yaml")).unwrap();
    assert!(yaml.contains("Focus:"));
    assert!(yaml.contains("viewColumn: 1"));
    assert!(yaml.contains("activeTabUri:"));
    assert!(yaml.contains("isPreview: true"));
    assert!(yaml.contains("type: file"));
    assert!(yaml.contains("type: other"));
    // Other tabs carry no uri key at all
    assert_eq!(yaml.matches("uri:").count(), 1);
}

#[tokio::test]
async fn test_reads_existing_workflows_file() {
    let temp = tempdir().unwrap();
    std::fs::write(
        temp.path().join("workflows.yaml"),
        r#"
Morning:
  - viewColumn: 1
    tabs:
      - uri: file:///notes.md
        isPreview: false
        label: notes.md
        type: file
      - isPreview: false
        label: Welcome
        type: other
    activeTabUri: file:///notes.md
"#,
    )
    .unwrap();

    let store = WorkflowStore::new(YamlFileStore::new(temp.path()));
    let morning = store.get("Morning").await.unwrap().unwrap();
    assert_eq!(morning.groups.len(), 1);
    assert_eq!(morning.groups[0].tabs[1], TabSnapshot::other("Welcome", false));
}

#[tokio::test]
async fn test_corrupt_store_surfaces_error() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("workflows.yaml"), "Focus: [[[").unwrap();

    let mut store = WorkflowStore::new(YamlFileStore::new(temp.path()));
    assert!(store.list().await.is_err());
    assert!(store.save("x", Vec::new()).await.is_err());
    assert_eq!(store.revision(), 0);
}

#[tokio::test]
async fn test_delete_tab_cascade_is_persisted() {
    let temp = tempdir().unwrap();
    let mut store = WorkflowStore::new(YamlFileStore::new(temp.path()));
    store
        .save(
            "W",
            vec![
                group(1, &["file:///a", "file:///b"], Some("file:///a")),
                group(2, &["file:///c"], None),
            ],
        )
        .await
        .unwrap();

    assert_eq!(
        store.delete_tab("W", 2, "c").await.unwrap(),
        DeleteTabOutcome::GroupRemoved
    );
    assert_eq!(
        store.delete_tab("W", 1, "a").await.unwrap(),
        DeleteTabOutcome::TabsRemoved(1)
    );

    let reread = YamlFileStore::new(temp.path()).read("workflows").await.unwrap();
    assert_eq!(reread.get("W").unwrap(), &[group(1, &["file:///b"], Some("file:///a"))][..]);

    assert_eq!(
        store.delete_tab("W", 1, "b").await.unwrap(),
        DeleteTabOutcome::WorkflowRemoved
    );
    assert!(YamlFileStore::new(temp.path()).read("workflows").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rename_keeps_position_on_disk() {
    let temp = tempdir().unwrap();
    let mut store = WorkflowStore::new(YamlFileStore::new(temp.path()));
    for name in ["one", "two", "three"] {
        store.save(name, Vec::new()).await.unwrap();
    }

    assert!(store.rename("two", "deux").await.unwrap());

    let reread: WorkflowCollection = YamlFileStore::new(temp.path()).read("workflows").await.unwrap();
    assert_eq!(reread.names(), vec!["one", "deux", "three"]);
}

#[tokio::test]
async fn test_custom_key_uses_its_own_file() {
    let temp = tempdir().unwrap();
    let mut store = WorkflowStore::with_key(YamlFileStore::new(temp.path()), "scratch");
    store.save("x", Vec::new()).await.unwrap();

    assert!(temp.path().join("scratch.yaml").exists());
    assert!(!temp.path().join("workflows.yaml").exists());
}

#[tokio::test]
async fn test_subscribers_see_every_mutation() {
    let temp = tempdir().unwrap();
    let mut store = WorkflowStore::new(YamlFileStore::new(temp.path()));
    let mut rx = store.subscribe();

    store.save("a", vec![group(1, &["file:///a"], None)]).await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), 1);

    store.rename("a", "b").await.unwrap();
    store.delete("b").await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 3);
    assert!(!rx.has_changed().unwrap());
}
