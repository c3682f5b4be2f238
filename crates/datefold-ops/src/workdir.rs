//! Scoped working-directory switching.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use datefold_core::CollapseError;

/// Changes the process working directory and restores it when dropped.
///
/// Restoration happens on every exit path, including early error returns
/// and panics, so a failed collapse never strands the caller inside the
/// target tree.
#[derive(Debug)]
pub struct WorkingDirGuard {
    previous: PathBuf,
}

impl WorkingDirGuard {
    /// Switch the working directory to `path`.
    pub fn change_to(path: &Path) -> Result<Self, CollapseError> {
        let previous = env::current_dir().map_err(|e| CollapseError::io(".", e))?;
        env::set_current_dir(path).map_err(|e| CollapseError::io(path, e))?;
        debug!(path = %path.display(), "changed working directory");
        Ok(Self { previous })
    }

    /// The directory restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        // Drop cannot propagate a restore failure; the process is left
        // inside the target tree.
        if let Err(e) = env::set_current_dir(&self.previous) {
            warn!(path = %self.previous.display(), error = %e, "failed to restore working directory");
        } else {
            debug!(path = %self.previous.display(), "restored working directory");
        }
    }
}
