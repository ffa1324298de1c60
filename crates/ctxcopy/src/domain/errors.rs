//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single document reference could not be resolved to content.
///
/// These are recovered locally: the offending entry is logged and skipped,
/// never aborting the rest of a batch.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to read {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8")]
    InvalidEncoding { path: PathBuf },
    #[error("no open document named '{0}'")]
    MissingDocument(String),
}
