//! Shared integration test helpers for tabshift.
//!
//! Provides a recording window host, a scripted user-interaction service,
//! and builders for live layouts.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{FakeHost, ScriptedUi, live_file, live_group};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers is used per test file.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::VecDeque;
use tabshift::traits::{
    HostError, LiveGroup, LiveTab, OpenOptions, TabInput, UserInteraction, WindowLayoutService,
};

/// One call made against [`FakeHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Open {
        uri: String,
        column: u32,
        preserve_focus: bool,
        preview: Option<bool>,
    },
    Action(String),
    CloseAll,
    SaveAll,
}

/// Window host that serves a fixed live layout and records every call.
#[derive(Default)]
pub struct FakeHost {
    pub live: Mutex<Vec<LiveGroup>>,
    pub calls: Mutex<Vec<HostCall>>,
    /// Uris whose open fails with NotFound
    pub missing: Vec<String>,
    pub fail_close: bool,
}

impl FakeHost {
    pub fn with_layout(live: Vec<LiveGroup>) -> Self {
        Self {
            live: Mutex::new(live),
            ..Default::default()
        }
    }

    pub fn set_layout(&self, live: Vec<LiveGroup>) {
        *self.live.lock() = live;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

impl WindowLayoutService for FakeHost {
    async fn list_groups(&self) -> Vec<LiveGroup> {
        self.live.lock().clone()
    }

    async fn open_resource(&self, uri: &str, options: OpenOptions) -> Result<(), HostError> {
        if self.missing.iter().any(|m| m == uri) {
            return Err(HostError::NotFound(uri.to_string()));
        }
        self.calls.lock().push(HostCall::Open {
            uri: uri.to_string(),
            column: options.view_column,
            preserve_focus: options.preserve_focus,
            preview: options.preview,
        });
        Ok(())
    }

    async fn close_all_tabs(&self) -> Result<(), HostError> {
        if self.fail_close {
            return Err(HostError::Other("editor busy".to_string()));
        }
        self.calls.lock().push(HostCall::CloseAll);
        Ok(())
    }

    async fn run_action(&self, action: &str) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::Action(action.to_string()));
        Ok(())
    }

    async fn save_all_documents(&self) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::SaveAll);
        Ok(())
    }
}

/// User interaction that replays queued answers and records messages.
///
/// An exhausted text or pick queue behaves like a dismissed prompt; an
/// exhausted confirm queue declines.
#[derive(Default)]
pub struct ScriptedUi {
    pub texts: Mutex<VecDeque<Option<String>>>,
    pub confirms: Mutex<VecDeque<bool>>,
    pub picks: Mutex<VecDeque<Option<String>>>,
    pub prompts: Mutex<Vec<(String, String)>>,
    pub confirmations: Mutex<Vec<(String, String)>>,
    pub infos: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_text(self, text: &str) -> Self {
        self.texts.lock().push_back(Some(text.to_string()));
        self
    }

    pub fn dismiss_text(self) -> Self {
        self.texts.lock().push_back(None);
        self
    }

    pub fn answer_confirm(self, yes: bool) -> Self {
        self.confirms.lock().push_back(yes);
        self
    }

    pub fn answer_pick(self, item: Option<&str>) -> Self {
        self.picks.lock().push_back(item.map(str::to_string));
        self
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    pub fn confirmations(&self) -> Vec<(String, String)> {
        self.confirmations.lock().clone()
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().clone()
    }
}

impl UserInteraction for ScriptedUi {
    async fn prompt_text(&self, prompt: &str, default_value: &str) -> Option<String> {
        self.prompts
            .lock()
            .push((prompt.to_string(), default_value.to_string()));
        self.texts.lock().pop_front().flatten()
    }

    async fn confirm(&self, message: &str, action_label: &str) -> bool {
        self.confirmations
            .lock()
            .push((message.to_string(), action_label.to_string()));
        self.confirms.lock().pop_front().unwrap_or(false)
    }

    async fn pick(&self, _items: &[String], _placeholder: &str) -> Option<String> {
        self.picks.lock().pop_front().flatten()
    }

    fn show_info(&self, message: &str) {
        self.infos.lock().push(message.to_string());
    }

    fn show_warning(&self, message: &str) {
        self.warnings.lock().push(message.to_string());
    }
}

/// A live text-document tab.
pub fn live_file(uri: &str, active: bool) -> LiveTab {
    LiveTab {
        input: TabInput::Text {
            uri: uri.to_string(),
        },
        label: uri.rsplit('/').next().unwrap_or(uri).to_string(),
        is_preview: false,
        is_active: active,
    }
}

/// A live tab with no resource (settings, welcome page).
pub fn live_special(label: &str) -> LiveTab {
    LiveTab {
        input: TabInput::Opaque,
        label: label.to_string(),
        is_preview: false,
        is_active: false,
    }
}

pub fn live_group(view_column: u32, tabs: Vec<LiveTab>) -> LiveGroup {
    LiveGroup { view_column, tabs }
}
