//! Resolving document references to display paths and text content.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::ResolveError;
use crate::domain::model::{DocRef, ResolvedFile};

/// Turns a [`DocRef`] into a [`ResolvedFile`].
///
/// File references are read from disk and decoded as UTF-8, with the display
/// path made relative to the workspace root when one is known. Untitled
/// references are served from the set of open in-memory documents supplied at
/// construction time.
#[derive(Debug, Default)]
pub struct Resolver {
    workspace_root: Option<PathBuf>,
    open_documents: HashMap<String, String>,
}

impl Resolver {
    /// Create a resolver rooted at the given workspace directory, if any.
    pub fn new(workspace_root: Option<PathBuf>) -> Self {
        Self {
            workspace_root,
            open_documents: HashMap::new(),
        }
    }

    /// Register the live buffers of unsaved documents, keyed by display name.
    pub fn with_open_documents<I>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.open_documents.extend(documents);
        self
    }

    /// Resolve a single reference. Attempted exactly once; the caller decides
    /// what a failure means for the rest of its batch.
    pub fn resolve(&self, doc: &DocRef) -> Result<ResolvedFile, ResolveError> {
        match doc {
            DocRef::Untitled(name) => {
                let content = self
                    .open_documents
                    .get(name)
                    .ok_or_else(|| ResolveError::MissingDocument(name.clone()))?;
                Ok(ResolvedFile {
                    relative_path: base_name(name),
                    content: content.clone(),
                })
            }
            DocRef::File(path) => {
                let bytes = fs::read(path).map_err(|source| ResolveError::Unreadable {
                    path: path.clone(),
                    source,
                })?;
                let content = String::from_utf8(bytes)
                    .map_err(|_| ResolveError::InvalidEncoding { path: path.clone() })?;
                let display = match &self.workspace_root {
                    Some(root) => path.strip_prefix(root).unwrap_or(path),
                    None => path,
                };
                Ok(ResolvedFile {
                    relative_path: forward_slashes(display),
                    content,
                })
            }
        }
    }
}

fn base_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_owned())
}

/// Normalize separators to `/` by splitting on the platform separator, so
/// backslashes that are legal filename characters elsewhere stay untouched.
fn forward_slashes(path: &Path) -> String {
    let display = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        display.into_owned()
    } else {
        display
            .split(std::path::MAIN_SEPARATOR)
            .collect::<Vec<_>>()
            .join("/")
    }
}
