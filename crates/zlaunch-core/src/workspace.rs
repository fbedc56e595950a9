//! Scoped working directory shared with the engine.
//!
//! At most one workspace exists at a time. Creating a new one removes the
//! previous directory first, and dropping the manager removes the current
//! one, so graceful shutdown never leaks a directory.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Error, Result};

/// Owner of the single live workspace directory.
#[derive(Debug)]
pub struct WorkspaceManager {
    /// Name prefix for created directories.
    prefix: String,
    /// Parent directory; system temp dir when `None`.
    root: Option<PathBuf>,
    current: Option<TempDir>,
}

impl WorkspaceManager {
    /// Create a manager that places workspaces in the system temp dir.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            root: None,
            current: None,
        }
    }

    /// Create a manager that places workspaces under `root`.
    pub fn with_root(prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            root: Some(root.into()),
            current: None,
        }
    }

    /// Replace the current workspace with a fresh, uniquely named directory.
    ///
    /// # Errors
    /// Returns [`Error::Workspace`] if the old directory cannot be removed or
    /// the new one cannot be created.
    pub fn create(&mut self) -> Result<PathBuf> {
        self.destroy()?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.prefix);
        let dir = match &self.root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|source| Error::Workspace {
            path: self.parent_dir(),
            source,
        })?;

        let path = dir.path().to_path_buf();
        tracing::info!("Workspace created at {}", path.display());
        self.current = Some(dir);
        Ok(path)
    }

    /// Remove the current workspace, if any.
    ///
    /// A directory that is already gone is not an error. Calling this with
    /// nothing tracked is a no-op.
    pub fn destroy(&mut self) -> Result<()> {
        let Some(dir) = self.current.take() else {
            return Ok(());
        };

        let path = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => {
                tracing::debug!("Workspace {} removed", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Workspace {} was already gone", path.display());
                Ok(())
            }
            Err(source) => Err(Error::Workspace { path, source }),
        }
    }

    /// Stop tracking the current workspace without removing it.
    ///
    /// The directory is left on disk and becomes the caller's to clean up.
    pub fn detach(&mut self) -> Option<PathBuf> {
        self.current.take().map(TempDir::keep)
    }

    /// Path of the current workspace.
    pub fn current(&self) -> Option<&Path> {
        self.current.as_ref().map(TempDir::path)
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    fn parent_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Drop for WorkspaceManager {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            tracing::warn!("Failed to clean up workspace: {}", e);
        }
    }
}
