//! Scratch-document delivery for aggregate output.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::debug;

use crate::app::aggregate::AGGREGATE_HEADER;

/// Creates the "new untitled document" artifact as a timestamped plain-text
/// file under a scratch directory.
#[derive(Debug, Clone)]
pub struct ScratchPad {
    dir: PathBuf,
}

impl ScratchPad {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the aggregate text to a fresh scratch file and return its path.
    ///
    /// Earlier scratch files holding an aggregate (recognized by the fixed
    /// header) are removed first, so at most one aggregate buffer lingers.
    /// That cleanup is best-effort; failures are logged and ignored.
    pub fn publish(&self, text: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create scratch directory {}", self.dir.display())
        })?;
        self.discard_stale_aggregates();

        let stamp = OffsetDateTime::now_utc()
            .format(format_description!(
                "[year][month][day]-[hour][minute][second]"
            ))
            .context("failed to format scratch timestamp")?;

        let mut path = self.dir.join(format!("aggregate-{stamp}.txt"));
        let mut counter = 1;
        while path.exists() {
            path = self.dir.join(format!("aggregate-{stamp}-{counter}.txt"));
            counter += 1;
        }

        fs::write(&path, text)
            .with_context(|| format!("failed to write scratch file to {}", path.display()))?;
        Ok(path)
    }

    fn discard_stale_aggregates(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %self.dir.display(), error = %err, "cannot scan scratch directory");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if starts_with_header(&path)
                && let Err(err) = fs::remove_file(&path)
            {
                debug!(path = %path.display(), error = %err, "failed to remove stale aggregate");
            }
        }
    }
}

/// Check the header prefix without loading the whole file; the scratch
/// directory may hold large unrelated files.
fn starts_with_header(path: &Path) -> bool {
    let Ok(mut file) = fs::File::open(path) else {
        return false;
    };
    let mut prefix = vec![0u8; AGGREGATE_HEADER.len()];
    match file.read_exact(&mut prefix) {
        Ok(()) => prefix == AGGREGATE_HEADER.as_bytes(),
        Err(_) => false,
    }
}
