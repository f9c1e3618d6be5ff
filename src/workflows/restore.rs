//! Replay a saved workflow onto the host.
//!
//! Restore runs in two passes over the stored groups:
//!
//! 1. **Open**: every tab, in stored order. File tabs are opened in their
//!    column with their preview flag and without taking focus. Other tabs
//!    run the host action configured for their label, or are skipped.
//! 2. **Activate**: each group's active tab is opened again, focused and
//!    pinned, so it ends up active in its column.
//!
//! Activation has to wait until every tab exists; opening a later tab in the
//! same column would otherwise take the active slot. Each host call is
//! awaited before the next one starts.
//!
//! A failing tab is recorded in the [`RestoreReport`] and the restore moves on.

use super::{GroupSnapshot, TabSnapshot};
use crate::traits::{HostError, OpenOptions, WindowLayoutService};
use tabshift_config::{SpecialTabAction, special_tab_action};

/// A tab that could not be reopened during the open pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabFailure {
    pub view_column: u32,
    pub tab: TabSnapshot,
    pub error: HostError,
}

/// A group whose active tab could not be focused during the activation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationFailure {
    pub view_column: u32,
    pub uri: String,
    pub error: HostError,
}

/// What a restore did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// File tabs opened
    pub opened: usize,
    /// Other tabs reopened through a host action
    pub actions_run: usize,
    /// Labels of Other tabs with no known action
    pub skipped: Vec<String>,
    /// Groups whose active tab was focused
    pub activated: usize,
    pub tab_failures: Vec<TabFailure>,
    pub activation_failures: Vec<ActivationFailure>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.tab_failures.is_empty() && self.activation_failures.is_empty()
    }
}

async fn open_tab<W: WindowLayoutService>(
    host: &W,
    tab: &TabSnapshot,
    view_column: u32,
    special_tabs: &[SpecialTabAction],
    report: &mut RestoreReport,
) -> Result<(), HostError> {
    if let Some(uri) = tab.uri.as_deref().filter(|u| !u.is_empty()) {
        let options = OpenOptions {
            view_column,
            preserve_focus: true,
            preview: Some(tab.is_preview),
        };
        host.open_resource(uri, options).await?;
        report.opened += 1;
        return Ok(());
    }

    match special_tab_action(special_tabs, &tab.label) {
        Some(action) => {
            host.run_action(action).await?;
            report.actions_run += 1;
        }
        None => {
            crate::debug_log!("RESTORE", "No restore action for special tab '{}'", tab.label);
            report.skipped.push(tab.label.clone());
        }
    }
    Ok(())
}

/// Open every tab, then activate each group's active tab.
///
/// Existing tabs are left alone; see [`replace_layout`] for the full
/// close-then-restore sequence.
pub async fn restore_groups<W: WindowLayoutService>(
    host: &W,
    groups: &[GroupSnapshot],
    special_tabs: &[SpecialTabAction],
) -> RestoreReport {
    let mut report = RestoreReport::default();

    for group in groups {
        for tab in &group.tabs {
            if let Err(error) = open_tab(host, tab, group.view_column, special_tabs, &mut report).await
            {
                log::warn!("Failed to open tab {}: {}", tab.label, error);
                report.tab_failures.push(TabFailure {
                    view_column: group.view_column,
                    tab: tab.clone(),
                    error,
                });
            }
        }
    }

    for group in groups {
        let Some(active_uri) = group.active_tab_uri.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        let Some(tab) = group.active_tab() else {
            crate::debug_log!(
                "RESTORE",
                "Active tab {} not found in view column {}, skipping activation",
                active_uri,
                group.view_column
            );
            continue;
        };
        let Some(uri) = tab.uri.as_deref() else {
            continue;
        };

        let options = OpenOptions {
            view_column: group.view_column,
            preserve_focus: false,
            preview: Some(false),
        };
        match host.open_resource(uri, options).await {
            Ok(()) => report.activated += 1,
            Err(error) => {
                log::warn!("Failed to activate tab {}: {}", uri, error);
                report.activation_failures.push(ActivationFailure {
                    view_column: group.view_column,
                    uri: uri.to_string(),
                    error,
                });
            }
        }
    }

    crate::debug_info!(
        "RESTORE",
        "Restored {} groups: {} opened, {} actions, {} skipped, {} failed",
        groups.len(),
        report.opened,
        report.actions_run,
        report.skipped.len(),
        report.tab_failures.len() + report.activation_failures.len()
    );
    report
}

/// Close all current tabs, then restore `groups`.
///
/// Fails only if the host cannot close the existing tabs; per-tab failures
/// are in the returned report.
pub async fn replace_layout<W: WindowLayoutService>(
    host: &W,
    groups: &[GroupSnapshot],
    special_tabs: &[SpecialTabAction],
) -> Result<RestoreReport, HostError> {
    host.close_all_tabs().await?;
    Ok(restore_groups(host, groups, special_tabs).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LiveGroup;
    use parking_lot::Mutex;
    use tabshift_config::default_special_tabs;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Open {
            uri: String,
            column: u32,
            focus: bool,
            preview: Option<bool>,
        },
        Action(String),
        CloseAll,
    }

    #[derive(Default)]
    struct RecordingHost {
        calls: Mutex<Vec<Call>>,
        missing: Vec<String>,
    }

    impl RecordingHost {
        fn failing_on(uris: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                missing: uris.iter().map(|u| u.to_string()).collect(),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }
    }

    impl WindowLayoutService for RecordingHost {
        async fn list_groups(&self) -> Vec<LiveGroup> {
            Vec::new()
        }

        async fn open_resource(&self, uri: &str, options: OpenOptions) -> Result<(), HostError> {
            if self.missing.iter().any(|m| m == uri) {
                return Err(HostError::NotFound(uri.to_string()));
            }
            self.calls.lock().push(Call::Open {
                uri: uri.to_string(),
                column: options.view_column,
                focus: !options.preserve_focus,
                preview: options.preview,
            });
            Ok(())
        }

        async fn close_all_tabs(&self) -> Result<(), HostError> {
            self.calls.lock().push(Call::CloseAll);
            Ok(())
        }

        async fn run_action(&self, action: &str) -> Result<(), HostError> {
            self.calls.lock().push(Call::Action(action.to_string()));
            Ok(())
        }

        async fn save_all_documents(&self) -> Result<(), HostError> {
            Ok(())
        }
    }

    fn open(uri: &str, column: u32, focus: bool, preview: bool) -> Call {
        Call::Open {
            uri: uri.to_string(),
            column,
            focus,
            preview: Some(preview),
        }
    }

    #[tokio::test]
    async fn test_file_then_settings_then_activation() {
        let host = RecordingHost::default();
        let groups = vec![GroupSnapshot {
            view_column: 1,
            tabs: vec![
                TabSnapshot::file("file:///a.txt", "a.txt", false),
                TabSnapshot::other("Settings", false),
            ],
            active_tab_uri: Some("file:///a.txt".to_string()),
        }];

        let report = restore_groups(&host, &groups, &default_special_tabs()).await;

        assert_eq!(
            host.calls(),
            vec![
                open("file:///a.txt", 1, false, false),
                Call::Action("workbench.action.openSettings".to_string()),
                open("file:///a.txt", 1, true, false),
            ]
        );
        assert_eq!(report.opened, 1);
        assert_eq!(report.actions_run, 1);
        assert_eq!(report.activated, 1);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_activation_runs_after_all_groups_open() {
        let host = RecordingHost::default();
        let groups = vec![
            GroupSnapshot {
                view_column: 1,
                tabs: vec![
                    TabSnapshot::file("file:///a", "a", false),
                    TabSnapshot::file("file:///b", "b", true),
                ],
                active_tab_uri: Some("file:///a".to_string()),
            },
            GroupSnapshot {
                view_column: 2,
                tabs: vec![TabSnapshot::file("file:///c", "c", false)],
                active_tab_uri: Some("file:///c".to_string()),
            },
        ];

        restore_groups(&host, &groups, &[]).await;

        assert_eq!(
            host.calls(),
            vec![
                open("file:///a", 1, false, false),
                open("file:///b", 1, false, true),
                open("file:///c", 2, false, false),
                open("file:///a", 1, true, false),
                open("file:///c", 2, true, false),
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_special_tab_skipped() {
        let host = RecordingHost::default();
        let groups = vec![GroupSnapshot {
            view_column: 1,
            tabs: vec![
                TabSnapshot::other("Preview README.md", false),
                TabSnapshot::other("Welcome", false),
            ],
            active_tab_uri: None,
        }];

        let report = restore_groups(&host, &groups, &default_special_tabs()).await;

        assert_eq!(
            host.calls(),
            vec![Call::Action("workbench.action.showWelcomePage".to_string())]
        );
        assert_eq!(report.skipped, vec!["Preview README.md".to_string()]);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_failed_tab_does_not_abort_restore() {
        let host = RecordingHost::failing_on(&["file:///gone"]);
        let groups = vec![GroupSnapshot {
            view_column: 1,
            tabs: vec![
                TabSnapshot::file("file:///gone", "gone", false),
                TabSnapshot::file("file:///here", "here", false),
            ],
            active_tab_uri: Some("file:///gone".to_string()),
        }];

        let report = restore_groups(&host, &groups, &[]).await;

        assert_eq!(host.calls(), vec![open("file:///here", 1, false, false)]);
        assert_eq!(report.tab_failures.len(), 1);
        assert_eq!(report.tab_failures[0].tab.label, "gone");
        assert_eq!(
            report.tab_failures[0].error,
            HostError::NotFound("file:///gone".to_string())
        );
        assert_eq!(report.activation_failures.len(), 1);
        assert_eq!(report.activation_failures[0].uri, "file:///gone");
        assert_eq!(report.activated, 0);
    }

    #[tokio::test]
    async fn test_stale_active_uri_is_skipped() {
        let host = RecordingHost::default();
        let groups = vec![GroupSnapshot {
            view_column: 1,
            tabs: vec![TabSnapshot::file("file:///a", "a", false)],
            active_tab_uri: Some("file:///removed".to_string()),
        }];

        let report = restore_groups(&host, &groups, &[]).await;

        assert_eq!(host.calls(), vec![open("file:///a", 1, false, false)]);
        assert_eq!(report.activated, 0);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_replace_layout_closes_first() {
        let host = RecordingHost::default();
        let groups = vec![GroupSnapshot {
            view_column: 1,
            tabs: vec![TabSnapshot::file("file:///a", "a", false)],
            active_tab_uri: None,
        }];

        replace_layout(&host, &groups, &[]).await.unwrap();

        assert_eq!(
            host.calls(),
            vec![Call::CloseAll, open("file:///a", 1, false, false)]
        );
    }

    #[tokio::test]
    async fn test_restoring_twice_gives_same_active_tabs() {
        let host = RecordingHost::default();
        let groups = vec![GroupSnapshot {
            view_column: 1,
            tabs: vec![
                TabSnapshot::file("file:///a", "a", false),
                TabSnapshot::file("file:///b", "b", false),
            ],
            active_tab_uri: Some("file:///a".to_string()),
        }];

        replace_layout(&host, &groups, &[]).await.unwrap();
        let first = host.calls();
        host.calls.lock().clear();
        replace_layout(&host, &groups, &[]).await.unwrap();
        let second = host.calls();

        assert_eq!(first, second);
        assert_eq!(first.last(), Some(&open("file:///a", 1, true, false)));
    }
}
