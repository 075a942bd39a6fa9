//! Persisted id of the most recently notified post.
//!
//! The checkpoint is a plain text file holding a single decimal integer.
//! Reads never fail: a missing, unreadable or corrupt file counts as 0.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to write checkpoint {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File-backed checkpoint store.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last seen post id, defaulting to 0.
    pub async fn load(&self) -> u64 {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No checkpoint file yet");
                return 0;
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to read checkpoint: {e}");
                return 0;
            }
        };

        parse_checkpoint(&contents).unwrap_or_else(|| {
            warn!(
                path = %self.path.display(),
                contents = %contents.trim(),
                "Checkpoint is not an integer, starting from 0"
            );
            0
        })
    }

    /// Overwrite the checkpoint with `id`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, id: u64) -> Result<(), CheckpointError> {
        tokio::fs::write(&self.path, id.to_string())
            .await
            .map_err(|source| CheckpointError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

fn parse_checkpoint(contents: &str) -> Option<u64> {
    contents.trim().parse().ok()
}
