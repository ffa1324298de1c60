//! The persisted open-tab list that copy and aggregate batches draw from.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::model::{DocRef, Tab, TabInput};

const STORE_DIR: &str = ".ctxcopy";
const STORE_FILE: &str = "tabs.json";

/// Serializable representation of one open tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TabRecord {
    /// A text document backed by a file on disk.
    File {
        path: String,
        #[serde(default)]
        active: bool,
    },
    /// An unsaved text document; the live buffer travels with the record.
    Untitled {
        name: String,
        content: String,
        #[serde(default)]
        active: bool,
    },
    /// Something open that is not a text document (diff view, image, ...).
    Other {
        label: String,
        #[serde(default)]
        active: bool,
    },
}

impl TabRecord {
    pub fn is_active(&self) -> bool {
        match self {
            TabRecord::File { active, .. }
            | TabRecord::Untitled { active, .. }
            | TabRecord::Other { active, .. } => *active,
        }
    }

    fn set_active(&mut self, value: bool) {
        match self {
            TabRecord::File { active, .. }
            | TabRecord::Untitled { active, .. }
            | TabRecord::Other { active, .. } => *active = value,
        }
    }

    /// The name a user refers to this tab by: its path, buffer name, or label.
    pub fn name(&self) -> &str {
        match self {
            TabRecord::File { path, .. } => path,
            TabRecord::Untitled { name, .. } => name,
            TabRecord::Other { label, .. } => label,
        }
    }

    /// Convert into the domain [`Tab`] handed to the aggregator.
    pub fn to_tab(&self) -> Tab {
        let input = match self {
            TabRecord::File { path, .. } => TabInput::Document(DocRef::File(PathBuf::from(path))),
            TabRecord::Untitled { name, .. } => TabInput::Document(DocRef::Untitled(name.clone())),
            TabRecord::Other { label, .. } => TabInput::Other(label.clone()),
        };
        Tab {
            input,
            active: self.is_active(),
        }
    }
}

/// Ordered set of open tabs with at most one active entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TabList {
    pub tabs: Vec<TabRecord>,
}

impl TabList {
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Open a file tab, or focus the existing one when the path is already
    /// open.
    pub fn open_file(&mut self, path: impl Into<String>) {
        let path = path.into();
        if let Some(position) = self
            .tabs
            .iter()
            .position(|tab| matches!(tab, TabRecord::File { path: existing, .. } if *existing == path))
        {
            self.focus_index(position);
            return;
        }
        self.tabs.push(TabRecord::File {
            path,
            active: false,
        });
        self.focus_index(self.tabs.len() - 1);
    }

    /// Open an unsaved scratch buffer with the given live content. An existing
    /// buffer with the same name is replaced.
    pub fn open_untitled(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();
        if let Some(position) = self
            .tabs
            .iter()
            .position(|tab| matches!(tab, TabRecord::Untitled { name: existing, .. } if *existing == name))
        {
            self.tabs[position] = TabRecord::Untitled {
                name,
                content,
                active: false,
            };
            self.focus_index(position);
            return;
        }
        self.tabs.push(TabRecord::Untitled {
            name,
            content,
            active: false,
        });
        self.focus_index(self.tabs.len() - 1);
    }

    /// Record a non-text tab. It can be focused and closed, but never yields
    /// a document.
    pub fn open_placeholder(&mut self, label: impl Into<String>) {
        self.tabs.push(TabRecord::Other {
            label: label.into(),
            active: false,
        });
        self.focus_index(self.tabs.len() - 1);
    }

    /// Close the tab whose name matches. Returns `false` when nothing matched.
    pub fn close(&mut self, name: &str) -> bool {
        let before = self.tabs.len();
        self.tabs.retain(|tab| tab.name() != name);
        self.tabs.len() != before
    }

    /// Make the named tab the active one. Returns `false` when nothing
    /// matched.
    pub fn focus(&mut self, name: &str) -> bool {
        match self.tabs.iter().position(|tab| tab.name() == name) {
            Some(position) => {
                self.focus_index(position);
                true
            }
            None => false,
        }
    }

    fn focus_index(&mut self, position: usize) {
        for (index, tab) in self.tabs.iter_mut().enumerate() {
            tab.set_active(index == position);
        }
    }

    /// The currently active tab, if any.
    pub fn active(&self) -> Option<&TabRecord> {
        self.tabs.iter().find(|tab| tab.is_active())
    }

    /// Find a tab by the name a user refers to it by.
    pub fn find(&self, name: &str) -> Option<&TabRecord> {
        self.tabs.iter().find(|tab| tab.name() == name)
    }

    /// All tabs as domain values, in order.
    pub fn to_tabs(&self) -> Vec<Tab> {
        self.tabs.iter().map(TabRecord::to_tab).collect()
    }

    /// References of every open text document, in tab order.
    pub fn text_refs(&self) -> Vec<DocRef> {
        self.to_tabs()
            .iter()
            .filter_map(|tab| tab.document().cloned())
            .collect()
    }

    /// Live buffers of unsaved documents, for seeding the resolver.
    pub fn open_documents(&self) -> Vec<(String, String)> {
        self.tabs
            .iter()
            .filter_map(|tab| match tab {
                TabRecord::Untitled { name, content, .. } => {
                    Some((name.clone(), content.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

/// Persists the tab list under `.ctxcopy/` in the workspace root.
#[derive(Debug, Clone)]
pub struct TabStore {
    root: PathBuf,
    path: PathBuf,
}

impl TabStore {
    /// Create a store rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let path = root.join(STORE_DIR).join(STORE_FILE);
        Self { root, path }
    }

    /// Location of the persisted tab list.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted tab list, or an empty one when none exists yet.
    pub fn load(&self) -> Result<TabList> {
        if !self.path.exists() {
            return Ok(TabList::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read tab list at {}", self.path.display()))?;
        let list = serde_json::from_str(&data)
            .with_context(|| format!("invalid tab list in {}", self.path.display()))?;
        Ok(list)
    }

    /// Persist the tab list, creating parent directories as needed.
    pub fn save(&self, list: &TabList) -> Result<()> {
        let dir = self.path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create tab directory {}", dir.display()))?;

        let data = serde_json::to_string_pretty(list).context("failed to serialize tab list")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write tab list to {}", self.path.display()))?;
        Ok(())
    }
}
