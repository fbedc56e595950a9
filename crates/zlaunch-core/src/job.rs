//! Job documents and their hand-off to the engine.
//!
//! A job is written as JSON to a fixed filename inside the workspace; the
//! frame count travels as a command-line argument, not in the file.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A job document as read from disk.
///
/// The graph is opaque to the launcher. Any other top-level keys are kept
/// so the file the engine sees matches the one the caller provided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub graph: serde_json::Value,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Job {
    pub fn new(graph: serde_json::Value) -> Self {
        Self {
            graph,
            extra: serde_json::Map::new(),
        }
    }

    /// Read a job document from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(Error::JobEncoding)
    }
}

/// Serialize `job` into `dir/file_name` and return the file's path.
///
/// Encoding happens before anything touches the disk, so an unserializable
/// value yields [`Error::JobEncoding`] and never a half-written file.
pub fn write_job_file<J>(dir: &Path, file_name: &str, job: &J) -> Result<PathBuf>
where
    J: Serialize + ?Sized,
{
    let text = serde_json::to_string(job).map_err(Error::JobEncoding)?;

    let path = dir.join(file_name);
    fs::write(&path, text).map_err(|source| Error::Workspace {
        path: path.clone(),
        source,
    })?;

    tracing::debug!("Wrote job file {}", path.display());
    Ok(path)
}

/// Positional arguments of a job-mode engine invocation:
/// `<job-file> <frame-count> <workspace>`.
pub fn job_arguments(job_file: &Path, frames: u32, workspace: &Path) -> [OsString; 3] {
    [
        job_file.as_os_str().to_os_string(),
        OsString::from(frames.to_string()),
        workspace.as_os_str().to_os_string(),
    ]
}
