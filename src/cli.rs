//! Command-line interface for tabshift.
//!
//! Every subcommand works on the persistent workflow store. Subcommands that
//! need a live window (`save`, `restore`) read it from a `--layout` YAML file
//! and print the editor operations they would perform.

use crate::commands::{CommandOutcome, WorkflowCommands};
use crate::host::{LayoutFileHost, TerminalPrompt};
use crate::workflow_tree::render_tree;
use crate::workflows::storage::YamlFileStore;
use crate::workflows::store::WorkflowStore;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tabshift_config::Config;

/// tabshift - Save, merge, and restore named editor tab layouts
#[derive(Parser)]
#[command(name = "tabshift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (off, error, warn, info, debug, trace); overrides RUST_LOG and the config file
    #[arg(long, value_name = "LEVEL", global = true, value_parser = parse_log_level)]
    pub log_level: Option<log::LevelFilter>,

    /// Configuration file (default: ~/.config/tabshift/config.yaml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding workflows.yaml (overrides the config file)
    #[arg(long, value_name = "DIR", global = true)]
    pub storage_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List saved workflow names
    List,

    /// Print one saved workflow
    Show {
        name: String,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Print all workflows as a workflow / group / tab tree
    Tree,

    /// Capture a layout file as a workflow (merging into an existing one on confirmation)
    Save {
        /// Workflow name (prompted for when omitted)
        #[arg(long)]
        name: Option<String>,

        /// YAML dump of the live window state
        #[arg(long, value_name = "FILE")]
        layout: PathBuf,

        /// Merge into an existing workflow without asking
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Replay a saved workflow, printing each editor operation
    Restore {
        /// Workflow name (picked interactively when omitted)
        name: Option<String>,

        /// YAML dump of the window state to replace (default: empty window)
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,
    },

    /// Delete a saved workflow
    Delete { name: String },

    /// Rename a saved workflow (prompted for the new name unless --to is given)
    Rename {
        name: String,

        #[arg(long, value_name = "NEW_NAME")]
        to: Option<String>,
    },

    /// Remove tabs with the given label from one group of a workflow
    DeleteTab {
        workflow: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        view_column: u32,
        label: String,
    },

    /// Print the whole workflow collection
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Yaml)]
        format: ExportFormat,
    },
}

fn parse_log_level(value: &str) -> Result<log::LevelFilter, String> {
    value
        .parse()
        .map_err(|_| format!("invalid log level '{}'", value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Yaml,
    Json,
}

/// Load the configuration named on the command line (or the default one).
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.storage_dir {
        config.storage_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Run a parsed command line. Returns the process exit code.
pub async fn run(cli: Cli, config: Config) -> Result<i32> {
    let storage_dir = config.effective_storage_dir();
    crate::debug_info!("CLI", "Using workflow storage in {:?}", storage_dir);
    let store = WorkflowStore::new(YamlFileStore::new(storage_dir));

    match cli.command {
        Commands::List => {
            for name in store.list().await? {
                println!("{}", name);
            }
            Ok(0)
        }
        Commands::Show { name, json } => {
            let Some(workflow) = store.get(&name).await? else {
                eprintln!("Workflow '{}' not found", name);
                return Ok(1);
            };
            let out = if json {
                serde_json::to_string_pretty(&workflow.groups)?
            } else {
                serde_yaml_ng::to_string(&workflow.groups)?
            };
            println!("{}", out.trim_end());
            Ok(0)
        }
        Commands::Tree => {
            print!("{}", render_tree(&store.load().await?));
            Ok(0)
        }
        Commands::Save { name, layout, yes } => {
            let host = LayoutFileHost::from_file(&layout)?.with_echo(true);
            let prompt = TerminalPrompt::stdin()
                .with_preset_text(name)
                .assume_yes(yes);
            let mut commands = WorkflowCommands::new(host, prompt, store, config);
            exit_code(commands.save_workflow().await?)
        }
        Commands::Restore { name, layout } => {
            let host = match layout {
                Some(path) => LayoutFileHost::from_file(&path)?,
                None => LayoutFileHost::default(),
            }
            .with_echo(true);
            let mut commands = WorkflowCommands::new(host, TerminalPrompt::stdin(), store, config);
            exit_code(commands.restore_workflow(name.as_deref()).await?)
        }
        Commands::Delete { name } => {
            let mut commands = offline_commands(store, config);
            match commands.delete_workflow(&name).await? {
                CommandOutcome::NothingToDo => {
                    eprintln!("Workflow '{}' not found", name);
                    Ok(1)
                }
                outcome => exit_code(outcome),
            }
        }
        Commands::Rename { name, to } => {
            if !store.contains(&name).await? {
                eprintln!("Workflow '{}' not found", name);
                return Ok(1);
            }
            let prompt = TerminalPrompt::stdin().with_preset_text(to);
            let mut commands = WorkflowCommands::new(LayoutFileHost::default(), prompt, store, config);
            exit_code(commands.rename_workflow(&name).await?)
        }
        Commands::DeleteTab {
            workflow,
            view_column,
            label,
        } => {
            let mut commands = offline_commands(store, config);
            match commands.delete_tab(&workflow, view_column, &label).await? {
                CommandOutcome::NothingToDo => {
                    eprintln!(
                        "No tab '{}' in group {} of workflow '{}'",
                        label, view_column, workflow
                    );
                    Ok(1)
                }
                outcome => exit_code(outcome),
            }
        }
        Commands::Export { format } => {
            let collection = store.load().await?;
            let out = match format {
                ExportFormat::Yaml => serde_yaml_ng::to_string(&collection)?,
                ExportFormat::Json => serde_json::to_string_pretty(&collection)?,
            };
            println!("{}", out.trim_end());
            Ok(0)
        }
    }
}

/// Commands that only touch the store; no live window is involved.
fn offline_commands(
    store: WorkflowStore<YamlFileStore>,
    config: Config,
) -> WorkflowCommands<LayoutFileHost, TerminalPrompt<std::io::StdinLock<'static>>, YamlFileStore> {
    WorkflowCommands::new(LayoutFileHost::default(), TerminalPrompt::stdin(), store, config)
}

fn exit_code(outcome: CommandOutcome) -> Result<i32> {
    crate::debug_log!("CLI", "Command finished: {:?}", outcome);
    Ok(match outcome {
        CommandOutcome::Completed | CommandOutcome::NothingToDo => 0,
        CommandOutcome::Cancelled => 2,
        CommandOutcome::Failed => 1,
    })
}
