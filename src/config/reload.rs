//! Settings file hot reload.
//!
//! Polls the settings file's modification time once per frame. A changed
//! timestamp triggers a full re-parse; a file that fails to parse is logged
//! and skipped so the running simulation keeps its last good snapshot.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use super::SimulationParameters;
use crate::error::SimResult;

/// Watches one settings file for changes.
#[derive(Debug, Clone)]
pub struct ReloadWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl ReloadWatcher {
    /// Start watching `path`, remembering its current modification time.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_modified = modified(&path);
        Self {
            path,
            last_modified,
        }
    }

    /// Watched path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check the file and return a new snapshot if it changed since the last poll.
    ///
    /// Returns `None` when the timestamp is unchanged, the file is missing,
    /// or the new contents are invalid.
    pub fn poll(&mut self) -> Option<SimulationParameters> {
        let current = modified(&self.path);
        if current.is_none() || current == self.last_modified {
            return None;
        }
        self.last_modified = current;

        match self.reload() {
            Ok(params) => {
                debug!(path = %self.path.display(), "reloaded settings");
                Some(params)
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring invalid settings file");
                None
            }
        }
    }

    /// Parse the file unconditionally.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is invalid.
    pub fn reload(&self) -> SimResult<SimulationParameters> {
        SimulationParameters::load(&self.path)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
