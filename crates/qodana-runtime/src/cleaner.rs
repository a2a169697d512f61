//! Removal of the analysis results directory.

use std::path::Path;

use qodana_common::error::{QodanaError, Result};

/// Removes a results directory.
pub trait ResultsCleaner {
    /// Removes `dir` and everything below it.
    ///
    /// Returns `false` when there was nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but is not a directory, or if
    /// the directory cannot be removed.
    fn clean(&self, dir: &Path) -> Result<bool>;
}

/// Cleaner working on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResultsCleaner;

impl ResultsCleaner for FsResultsCleaner {
    fn clean(&self, dir: &Path) -> Result<bool> {
        if dir.parent().is_none() {
            return Err(QodanaError::Config {
                message: format!("refusing to remove filesystem root {}", dir.display()),
            });
        }
        if !dir.exists() {
            tracing::debug!(path = %dir.display(), "results directory absent");
            return Ok(false);
        }
        if !dir.is_dir() {
            return Err(QodanaError::Config {
                message: format!("results path {} is not a directory", dir.display()),
            });
        }
        std::fs::remove_dir_all(dir).map_err(|e| QodanaError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        tracing::info!(path = %dir.display(), "removed results directory");
        Ok(true)
    }
}
