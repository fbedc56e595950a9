//! Error types for zlaunch-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::DescriptorError;

/// Result type for zlaunch-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in zlaunch-core.
#[derive(Debug, Error)]
pub enum Error {
    /// Workspace directory could not be created, written or removed.
    #[error("workspace error at {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The job could not be encoded to (or decoded from) JSON.
    #[error("invalid job JSON: {0}")]
    JobEncoding(#[source] serde_json::Error),

    /// The engine executable could not be launched.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A query-mode engine run exited with a failure status.
    #[error("'{program}' exited with {status}{}", format_stderr(stderr))]
    ProcessExit {
        program: String,
        status: String,
        stderr: String,
    },

    /// A `DESC:` line violates the descriptor grammar.
    #[error("malformed descriptor on line {line} ({source}): {text}")]
    Protocol {
        line: usize,
        text: String,
        #[source]
        source: DescriptorError,
    },

    /// Configuration file could not be loaded.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}
