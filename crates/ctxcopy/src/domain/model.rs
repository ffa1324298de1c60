//! Domain models for document references and open tabs.

use std::fmt;
use std::path::PathBuf;

/// Reference to a document: either a file on disk or an unsaved in-memory
/// buffer identified by its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocRef {
    File(PathBuf),
    Untitled(String),
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocRef::File(path) => write!(f, "file:{}", path.display()),
            DocRef::Untitled(name) => write!(f, "untitled:{name}"),
        }
    }
}

/// What an open tab holds: a text document, or something that is not a text
/// document (a diff view, an image, ...) which only carries a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabInput {
    Document(DocRef),
    Other(String),
}

/// An open tab as tracked by the reference source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub input: TabInput,
    pub active: bool,
}

impl Tab {
    /// The document behind this tab, when it is a text document.
    pub fn document(&self) -> Option<&DocRef> {
        match &self.input {
            TabInput::Document(doc) => Some(doc),
            TabInput::Other(_) => None,
        }
    }

}

/// A document reference resolved to its display path and full text content.
///
/// Produced fresh on every resolution and never cached. `relative_path` always
/// uses forward slashes, whatever the host platform's separator is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub relative_path: String,
    pub content: String,
}
