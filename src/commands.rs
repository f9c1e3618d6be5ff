//! User-facing workflow commands.
//!
//! Each command is one complete user interaction: prompts, the engine calls,
//! persistence, and the final notification. Commands never fail for
//! user-level reasons; a dismissed prompt, a missing workflow, or a tab
//! that will not open each end in an [`CommandOutcome`] plus (at most) a
//! message. Only persistence I/O errors are returned as `Err`.

use crate::traits::{KeyValueStore, OpenOptions, UserInteraction, WindowLayoutService};
use crate::workflows::capture::capture_layout;
use crate::workflows::merge::merge_groups;
use crate::workflows::restore::{RestoreReport, replace_layout};
use crate::workflows::store::{DeleteTabOutcome, WorkflowStore};
use crate::workflows::TabSnapshot;
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;
use std::fmt::Display;
use tabshift_config::Config;

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command did its work
    Completed,
    /// The user dismissed a prompt or declined a confirmation
    Cancelled,
    /// There was nothing to act on (no workflows, empty workflow, unknown tab)
    NothingToDo,
    /// The host refused a step the command cannot continue without
    Failed,
}

/// Default name offered when saving: `"<prefix> YYYY-MM-DD HH_MM_SS"`.
pub fn default_workflow_name<Tz: TimeZone>(prefix: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("{} {}", prefix, now.format("%Y-%m-%d %H_%M_%S"))
}

/// A command invocation as delivered by an external trigger (menu, keybinding,
/// tree item), e.g. `{"command": "openTab", "args": {"tab": {...}, "viewColumn": 2}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "command",
    content = "args",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    SaveWorkflow,
    /// `args` may be left out entirely to pick interactively
    RestoreWorkflow(Option<RestoreArgs>),
    RefreshWorkflows,
    OpenTab {
        tab: TabSnapshot,
        #[serde(deserialize_with = "tabshift_config::deserialize_view_column")]
        view_column: u32,
    },
    DeleteWorkflow {
        name: String,
    },
    RenameWorkflow {
        name: String,
    },
    DeleteTab {
        workflow_name: String,
        #[serde(deserialize_with = "tabshift_config::deserialize_view_column")]
        view_column: u32,
        tab_label: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RestoreArgs {
    #[serde(default)]
    pub name: Option<String>,
}

pub struct WorkflowCommands<W, U, S> {
    host: W,
    ui: U,
    store: WorkflowStore<S>,
    config: Config,
}

impl<W, U, S> WorkflowCommands<W, U, S>
where
    W: WindowLayoutService,
    U: UserInteraction,
    S: KeyValueStore,
{
    pub fn new(host: W, ui: U, store: WorkflowStore<S>, config: Config) -> Self {
        Self {
            host,
            ui,
            store,
            config,
        }
    }

    pub fn host(&self) -> &W {
        &self.host
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn store(&self) -> &WorkflowStore<S> {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Dispatch a command received from outside.
    pub async fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::SaveWorkflow => self.save_workflow().await,
            Command::RestoreWorkflow(args) => {
                let name = args.and_then(|a| a.name);
                self.restore_workflow(name.as_deref()).await
            }
            Command::RefreshWorkflows => {
                self.refresh_workflows();
                Ok(CommandOutcome::Completed)
            }
            Command::OpenTab { tab, view_column } => Ok(self.open_tab(&tab, view_column).await),
            Command::DeleteWorkflow { name } => self.delete_workflow(&name).await,
            Command::RenameWorkflow { name } => self.rename_workflow(&name).await,
            Command::DeleteTab {
                workflow_name,
                view_column,
                tab_label,
            } => {
                self.delete_tab(&workflow_name, view_column, &tab_label)
                    .await
            }
        }
    }

    /// Capture the current layout under a prompted name, merging into an
    /// existing workflow of that name if the user agrees.
    pub async fn save_workflow(&mut self) -> Result<CommandOutcome> {
        let default_name = default_workflow_name(&self.config.default_name_prefix, &Local::now());
        let Some(name) = self
            .ui
            .prompt_text("Enter a name for this workflow", &default_name)
            .await
            .filter(|n| !n.is_empty())
        else {
            return Ok(CommandOutcome::Cancelled);
        };

        if self.config.save_documents_before_capture
            && let Err(e) = self.host.save_all_documents().await
        {
            log::warn!("Failed to save open documents: {}", e);
            self.ui
                .show_warning(&format!("Could not save open documents: {}", e));
        }

        crate::debug_info!("WORKFLOW", "Saving workflow: {}", name);
        let captured = capture_layout(&self.host).await;

        let (groups, message) = match self.store.get(&name).await? {
            Some(existing) => {
                let confirmed = self
                    .ui
                    .confirm(
                        &format!(
                            "Workflow '{}' already exists. Do you want to merge the current tabs into it?",
                            name
                        ),
                        "Merge",
                    )
                    .await;
                if !confirmed {
                    return Ok(CommandOutcome::Cancelled);
                }
                crate::debug_info!("WORKFLOW", "Merging into existing workflow: {}", name);
                (
                    merge_groups(&existing.groups, &captured),
                    format!("Workflow '{}' merged!", name),
                )
            }
            None => (captured, format!("Workflow '{}' saved!", name)),
        };

        crate::debug_info!("WORKFLOW", "Saving {} groups to workflow", groups.len());
        self.store.save(&name, groups).await?;
        self.ui.show_info(&message);

        if self.config.close_tabs_after_save
            && let Err(e) = self.host.close_all_tabs().await
        {
            log::warn!("Failed to close tabs after save: {}", e);
            self.ui.show_warning(&format!("Could not close open tabs: {}", e));
        }
        Ok(CommandOutcome::Completed)
    }

    /// Replace the current layout with a saved workflow.
    ///
    /// Without a name the user picks one from the saved workflows.
    pub async fn restore_workflow(&mut self, name: Option<&str>) -> Result<CommandOutcome> {
        let name = match name {
            Some(name) => name.to_string(),
            None => {
                let names = self.store.list().await?;
                if names.is_empty() {
                    self.ui.show_info("No saved workflows to restore.");
                    return Ok(CommandOutcome::NothingToDo);
                }
                match self.ui.pick(&names, "Select a workflow to restore").await {
                    Some(name) if !name.is_empty() => name,
                    _ => return Ok(CommandOutcome::Cancelled),
                }
            }
        };

        let groups = match self.store.get(&name).await? {
            Some(workflow) if !workflow.groups.is_empty() => workflow.groups,
            _ => {
                self.ui.show_info("No saved tab groups to restore.");
                return Ok(CommandOutcome::NothingToDo);
            }
        };

        log::info!("Restoring workflow '{}' ({} groups)", name, groups.len());
        let report = match replace_layout(&self.host, &groups, &self.config.special_tabs).await {
            Ok(report) => report,
            Err(e) => {
                log::error!("Failed to close tabs before restoring '{}': {}", name, e);
                self.ui.show_warning(&format!("Could not close open tabs: {}", e));
                return Ok(CommandOutcome::Failed);
            }
        };

        self.report_restore_failures(&report);
        self.ui.show_info(&format!("Workflow '{}' restored!", name));
        Ok(CommandOutcome::Completed)
    }

    fn report_restore_failures(&self, report: &RestoreReport) {
        for failure in &report.tab_failures {
            self.ui
                .show_warning(&format!("Could not restore tab: {}", failure.tab.label));
        }
        for failure in &report.activation_failures {
            self.ui
                .show_warning(&format!("Could not activate tab: {}", failure.uri));
        }
    }

    /// Ask listeners to redraw the workflow list.
    pub fn refresh_workflows(&self) {
        self.store.refresh();
    }

    /// Open a single saved tab in `view_column`. Tabs without a uri are ignored.
    pub async fn open_tab(&self, tab: &TabSnapshot, view_column: u32) -> CommandOutcome {
        let Some(uri) = tab.uri.as_deref().filter(|u| !u.is_empty()) else {
            return CommandOutcome::NothingToDo;
        };
        let options = OpenOptions {
            view_column,
            preserve_focus: false,
            preview: None,
        };
        match self.host.open_resource(uri, options).await {
            Ok(()) => CommandOutcome::Completed,
            Err(e) => {
                log::warn!("Failed to open tab {}: {}", tab.label, e);
                self.ui
                    .show_warning(&format!("Could not open tab: {}", tab.label));
                CommandOutcome::Failed
            }
        }
    }

    pub async fn delete_workflow(&mut self, name: &str) -> Result<CommandOutcome> {
        if !self.store.delete(name).await? {
            return Ok(CommandOutcome::NothingToDo);
        }
        self.ui.show_info(&format!("Workflow '{}' deleted.", name));
        Ok(CommandOutcome::Completed)
    }

    /// Prompt for a new name and rename. An existing workflow with the new
    /// name is replaced.
    pub async fn rename_workflow(&mut self, name: &str) -> Result<CommandOutcome> {
        let Some(new_name) = self
            .ui
            .prompt_text("Enter a new name for this workflow", name)
            .await
            .filter(|n| !n.is_empty() && n != name)
        else {
            return Ok(CommandOutcome::Cancelled);
        };

        if self.store.rename(name, &new_name).await? {
            Ok(CommandOutcome::Completed)
        } else {
            Ok(CommandOutcome::NothingToDo)
        }
    }

    /// Remove tabs labeled `tab_label` from one group of a saved workflow.
    pub async fn delete_tab(
        &mut self,
        workflow_name: &str,
        view_column: u32,
        tab_label: &str,
    ) -> Result<CommandOutcome> {
        let outcome = self
            .store
            .delete_tab(workflow_name, view_column, tab_label)
            .await?;
        crate::debug_log!(
            "WORKFLOW",
            "Delete tab '{}' from '{}' column {}: {:?}",
            tab_label,
            workflow_name,
            view_column,
            outcome
        );
        Ok(match outcome {
            DeleteTabOutcome::NotFound => CommandOutcome::NothingToDo,
            _ => CommandOutcome::Completed,
        })
    }
}
