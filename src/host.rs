//! Host services for the command-line front end.
//!
//! The CLI has no editor to drive, so [`LayoutFileHost`] stands in for one:
//! it starts from a YAML dump of the live window state and keeps an
//! in-memory copy that open/close calls update, printing every operation
//! it performs. [`TerminalPrompt`] answers prompts from a line reader
//! (stdin in the binary, a buffer in tests).

use crate::traits::{
    HostError, LiveGroup, LiveTab, OpenOptions, TabInput, UserInteraction, WindowLayoutService,
};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::io::{self, BufRead, Write};
use std::path::Path;
use url::Url;

/// Window host backed by a layout file.
#[derive(Debug, Default)]
pub struct LayoutFileHost {
    groups: Mutex<Vec<LiveGroup>>,
    operations: Mutex<Vec<String>>,
    echo: bool,
}

impl LayoutFileHost {
    pub fn new(groups: Vec<LiveGroup>) -> Self {
        Self {
            groups: Mutex::new(groups),
            operations: Mutex::new(Vec::new()),
            echo: false,
        }
    }

    /// Load the live layout from a YAML list of groups.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout from {:?}", path))?;
        let groups: Vec<LiveGroup> = if contents.trim().is_empty() {
            Vec::new()
        } else {
            serde_yaml_ng::from_str(&contents)
                .with_context(|| format!("Failed to parse layout from {:?}", path))?
        };
        log::info!("Loaded {} live groups from {:?}", groups.len(), path);
        Ok(Self::new(groups))
    }

    /// Print each operation to stdout as it happens.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Operations performed so far, in order.
    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().clone()
    }

    /// Current simulated layout.
    pub fn groups(&self) -> Vec<LiveGroup> {
        self.groups.lock().clone()
    }

    fn record(&self, operation: String) {
        if self.echo {
            println!("{}", operation);
        }
        self.operations.lock().push(operation);
    }
}

/// Local files must exist to be opened; other schemes are accepted as-is.
fn check_resource(uri: &str) -> Result<(), HostError> {
    let Ok(url) = Url::parse(uri) else {
        return Ok(());
    };
    if url.scheme() != "file" {
        return Ok(());
    }
    let path = url
        .to_file_path()
        .map_err(|_| HostError::Unsupported(uri.to_string()))?;
    match std::fs::metadata(&path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(HostError::PermissionDenied(uri.to_string()))
        }
        Err(_) => Err(HostError::NotFound(uri.to_string())),
    }
}

fn label_for(uri: &str) -> String {
    uri.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(uri)
        .to_string()
}

impl WindowLayoutService for LayoutFileHost {
    async fn list_groups(&self) -> Vec<LiveGroup> {
        self.groups.lock().clone()
    }

    async fn open_resource(&self, uri: &str, options: OpenOptions) -> Result<(), HostError> {
        check_resource(uri)?;
        self.record(format!(
            "open {} in column {} (focus: {}, preview: {})",
            uri,
            options.view_column,
            !options.preserve_focus,
            options
                .preview
                .map_or_else(|| "default".to_string(), |p| p.to_string())
        ));

        let mut groups = self.groups.lock();
        let index = match groups
            .iter()
            .position(|g| g.view_column == options.view_column)
        {
            Some(index) => index,
            None => {
                groups.push(LiveGroup {
                    view_column: options.view_column,
                    tabs: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];

        let position = match group
            .tabs
            .iter()
            .position(|t| t.input.resource_uri() == Some(uri))
        {
            Some(position) => position,
            None => {
                group.tabs.push(LiveTab {
                    input: TabInput::Text {
                        uri: uri.to_string(),
                    },
                    label: label_for(uri),
                    is_preview: options.preview.unwrap_or(false),
                    is_active: false,
                });
                group.tabs.len() - 1
            }
        };
        if options.preview == Some(false) {
            group.tabs[position].is_preview = false;
        }
        if !options.preserve_focus || group.tabs.len() == 1 {
            for (i, tab) in group.tabs.iter_mut().enumerate() {
                tab.is_active = i == position;
            }
        }
        Ok(())
    }

    async fn close_all_tabs(&self) -> Result<(), HostError> {
        self.record("close all tabs".to_string());
        self.groups.lock().clear();
        Ok(())
    }

    async fn run_action(&self, action: &str) -> Result<(), HostError> {
        self.record(format!("run action {}", action));
        Ok(())
    }

    async fn save_all_documents(&self) -> Result<(), HostError> {
        self.record("save all documents".to_string());
        Ok(())
    }
}

/// Line-based prompts on a terminal.
pub struct TerminalPrompt<R> {
    input: Mutex<R>,
    preset_text: Mutex<Option<String>>,
    assume_yes: bool,
}

impl TerminalPrompt<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> TerminalPrompt<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
            preset_text: Mutex::new(None),
            assume_yes: false,
        }
    }

    /// Answer the next text prompt with `text` instead of reading a line.
    pub fn with_preset_text(self, text: Option<String>) -> Self {
        *self.preset_text.lock() = text;
        self
    }

    /// Answer every confirmation with yes without asking.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Print `prompt` and read one line. `None` on end of input.
    fn ask(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        match self.input.lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                log::warn!("Failed to read from terminal: {}", e);
                None
            }
        }
    }
}

impl<R: BufRead> UserInteraction for TerminalPrompt<R> {
    async fn prompt_text(&self, prompt: &str, default_value: &str) -> Option<String> {
        if let Some(text) = self.preset_text.lock().take() {
            return Some(text);
        }
        let answer = self.ask(&format!("{} [{}]: ", prompt, default_value))?;
        if answer.is_empty() {
            Some(default_value.to_string())
        } else {
            Some(answer)
        }
    }

    async fn confirm(&self, message: &str, action_label: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        println!("{}", message);
        let Some(response) = self.ask(&format!("{}? [y/N] ", action_label)) else {
            return false;
        };
        let response = response.to_lowercase();
        response == "y" || response == "yes"
    }

    async fn pick(&self, items: &[String], placeholder: &str) -> Option<String> {
        println!("{}:", placeholder);
        for (i, item) in items.iter().enumerate() {
            println!("  {}. {}", i + 1, item);
        }
        let answer = self.ask("> ")?;
        if let Ok(index) = answer.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| items.get(i))
                .cloned();
        }
        items.iter().find(|item| **item == answer).cloned()
    }

    fn show_info(&self, message: &str) {
        println!("{}", message);
    }

    fn show_warning(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }
}
