//! Command-line surface: copy/aggregate commands, tab management, completions.

use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::aggregate::{self, BuildReport};
use crate::app::resolve::Resolver;
use crate::app::tabs::{TabList, TabRecord, TabStore};
use crate::domain::model::DocRef;
use crate::infra::clipboard::Clipboard;
use crate::infra::config::{Config, find_workspace_root};
use crate::infra::scratch::ScratchPad;

#[derive(Parser)]
#[command(
    name = "ctxcopy",
    version,
    about = "Copy open documents to the clipboard or a scratch buffer, path-labeled"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy file or tab contents to the clipboard, one path-labeled block per file
    Copy {
        /// Files to copy; when omitted, the active tab is used
        paths: Vec<PathBuf>,
        /// Copy every open text tab
        #[arg(long, conflicts_with_all = ["paths", "tab"])]
        all: bool,
        /// Copy the named tab instead of the active one
        #[arg(long, value_name = "NAME", conflicts_with = "paths")]
        tab: Option<String>,
        /// Write the result to stdout instead of the clipboard
        #[arg(long)]
        print: bool,
    },
    /// Concatenate open tabs into a new scratch document
    Aggregate {
        /// Aggregate only the named tab
        #[arg(long, value_name = "NAME", conflicts_with = "active")]
        tab: Option<String>,
        /// Aggregate only the active tab
        #[arg(long)]
        active: bool,
        /// Write the result to stdout instead of a scratch file
        #[arg(long)]
        print: bool,
    },
    /// Manage the open-tab list
    Tab {
        #[command(subcommand)]
        action: TabAction,
    },
    /// Generate shell completion scripts
    Completions { shell: Shell },
}

#[derive(Subcommand)]
enum TabAction {
    /// Open file tabs
    Open { paths: Vec<PathBuf> },
    /// Open an unsaved scratch buffer; content comes from --content or stdin
    Scratch {
        name: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Record a non-text tab (it can be focused and closed, never copied)
    Placeholder { label: String },
    /// Close a tab by path or name
    Close { name: String },
    /// Focus a tab by path or name
    Focus { name: String },
    /// List open tabs
    List,
}

/// Parse arguments and run the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = env::current_dir().context("failed to determine current directory")?;
    let workspace_root = find_workspace_root(&cwd);
    let config = Config::load(workspace_root.as_deref())?;
    let store = TabStore::new(workspace_root.clone().unwrap_or_else(|| cwd.clone()));

    match cli.command {
        Command::Copy {
            paths,
            all,
            tab,
            print,
        } => copy(&config, &store, workspace_root, paths, all, tab, print),
        Command::Aggregate { tab, active, print } => {
            run_aggregate(&config, &store, workspace_root, tab, active, print)
        }
        Command::Tab { action } => tab_command(&store, action),
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ctxcopy", &mut io::stdout());
            Ok(())
        }
    }
}

fn copy(
    config: &Config,
    store: &TabStore,
    workspace_root: Option<PathBuf>,
    paths: Vec<PathBuf>,
    all: bool,
    tab: Option<String>,
    print: bool,
) -> Result<()> {
    let list = store.load()?;

    let refs: Vec<DocRef> = if !paths.is_empty() {
        paths.into_iter().map(DocRef::File).collect()
    } else if all {
        list.text_refs()
    } else {
        let record = match &tab {
            Some(name) => list.find(name),
            None => list.active(),
        };
        let Some(record) = record else {
            println!("Could not identify the selected tab.");
            return Ok(());
        };
        match record.to_tab().document() {
            Some(doc) => vec![doc.clone()],
            None => {
                println!("The selected tab is not a text file.");
                return Ok(());
            }
        }
    };

    if refs.is_empty() {
        println!("No files to copy.");
        return Ok(());
    }

    let resolver = Resolver::new(workspace_root).with_open_documents(list.open_documents());
    let report = aggregate::build_clipboard_text(&resolver, &refs);
    announce_failures(config, &report);

    let Some(text) = report.text else {
        println!("No files to copy.");
        return Ok(());
    };

    if print {
        println!("{text}");
    } else {
        Clipboard::new(config.clipboard.allow_fallback_commands())
            .copy(&text)
            .context("failed to copy to clipboard")?;
        println!(
            "Copied content of {} file(s) to clipboard.",
            report.resolved
        );
    }
    Ok(())
}

fn run_aggregate(
    config: &Config,
    store: &TabStore,
    workspace_root: Option<PathBuf>,
    tab: Option<String>,
    active: bool,
    print: bool,
) -> Result<()> {
    let list = store.load()?;

    let tabs = if tab.is_some() || active {
        let record = match &tab {
            Some(name) => list.find(name),
            None => list.active(),
        };
        let Some(record) = record else {
            println!("Could not identify the selected tab.");
            return Ok(());
        };
        vec![record.to_tab()]
    } else {
        list.to_tabs()
    };

    let resolver = Resolver::new(workspace_root).with_open_documents(list.open_documents());
    let report = aggregate::build_aggregate_text(&resolver, &tabs);
    announce_failures(config, &report);

    let Some(text) = report.text else {
        println!("No text files found to aggregate.");
        return Ok(());
    };

    if print {
        println!("{text}");
    } else {
        let pad = ScratchPad::new(config.defaults.scratch_dir());
        let path = pad.publish(&text)?;
        println!(
            "Aggregated {} file(s) into {}",
            report.resolved,
            path.display()
        );
    }
    Ok(())
}

fn tab_command(store: &TabStore, action: TabAction) -> Result<()> {
    let mut list = store.load()?;
    match action {
        TabAction::Open { paths } => {
            for path in &paths {
                list.open_file(path.to_string_lossy());
            }
            store.save(&list)?;
            println!("Opened {} tab(s).", paths.len());
        }
        TabAction::Scratch { name, content } => {
            let content = match content {
                Some(content) => content,
                None => {
                    let mut buffer = String::new();
                    io::stdin()
                        .read_to_string(&mut buffer)
                        .context("failed to read scratch content from stdin")?;
                    buffer
                }
            };
            list.open_untitled(name.as_str(), content);
            store.save(&list)?;
            println!("Opened scratch buffer '{name}'.");
        }
        TabAction::Placeholder { label } => {
            list.open_placeholder(label.as_str());
            store.save(&list)?;
            println!("Recorded non-text tab '{label}'.");
        }
        TabAction::Close { name } => {
            if list.close(&name) {
                store.save(&list)?;
                println!("Closed '{name}'.");
            } else {
                println!("No open tab named '{name}'.");
            }
        }
        TabAction::Focus { name } => {
            if list.focus(&name) {
                store.save(&list)?;
                println!("Focused '{name}'.");
            } else {
                println!("No open tab named '{name}'.");
            }
        }
        TabAction::List => print_tabs(&list),
    }
    Ok(())
}

fn print_tabs(list: &TabList) {
    if list.is_empty() {
        println!("No open tabs.");
        return;
    }
    for record in &list.tabs {
        let marker = if record.is_active() { '*' } else { ' ' };
        let kind = match record {
            TabRecord::File { .. } => "file",
            TabRecord::Untitled { .. } => "untitled",
            TabRecord::Other { .. } => "other",
        };
        println!("{marker} {kind:<8} {}", record.name());
    }
}

fn announce_failures(config: &Config, report: &BuildReport) {
    if !config.defaults.announce_failures() {
        return;
    }
    for (doc, err) in &report.skipped {
        eprintln!("Skipped {doc}: {err}");
    }
}
