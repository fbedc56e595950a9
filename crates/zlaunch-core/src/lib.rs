//! Core of the engine launcher.
//!
//! This crate provides:
//! - Workspace management (one scoped temp directory per submitted job)
//! - Process supervision (at most one tracked engine child)
//! - Job submission (job file + positional arguments)
//! - The `DESC:` descriptor protocol parser
//! - A [`Launcher`] facade that owns all of the above

pub mod config;
pub mod descriptor;
pub mod error;
pub mod job;
pub mod launcher;
pub mod supervisor;
pub mod workspace;

pub use config::{LauncherConfig, LoadedConfig};
pub use descriptor::{
    Descriptor, DescriptorCatalog, DescriptorError, ParamDescriptor, parse_catalog,
    parse_descriptor_line,
};
pub use error::{Error, Result};
pub use job::{Job, job_arguments, write_job_file};
pub use launcher::{Launcher, Submission};
pub use supervisor::{ProcessSupervisor, Termination};
pub use workspace::WorkspaceManager;
