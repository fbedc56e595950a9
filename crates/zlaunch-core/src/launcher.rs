//! The launcher facade.
//!
//! A `Launcher` owns the process supervisor and the workspace manager for the
//! lifetime of the program. Hosts create one at startup and keep it until
//! exit; dropping it kills the engine and removes the workspace.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use serde::Serialize;

use crate::config::LauncherConfig;
use crate::descriptor::{DescriptorCatalog, parse_catalog};
use crate::error::Result;
use crate::job::{job_arguments, write_job_file};
use crate::supervisor::{ProcessSupervisor, Termination};
use crate::workspace::WorkspaceManager;

/// A job that has been handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// PID of the engine running the job.
    pub pid: u32,
    /// Workspace the engine writes its outputs into.
    pub workspace: PathBuf,
    pub job_file: PathBuf,
}

/// Launches jobs on the engine and queries its descriptors.
#[derive(Debug)]
pub struct Launcher {
    config: LauncherConfig,
    // Field order matters: the child is killed before its workspace goes.
    supervisor: ProcessSupervisor,
    workspace: WorkspaceManager,
}

impl Launcher {
    pub fn new(config: LauncherConfig) -> Self {
        let workspace = match &config.workspace_root {
            Some(root) => WorkspaceManager::with_root(&config.workspace_prefix, root),
            None => WorkspaceManager::new(&config.workspace_prefix),
        };

        Self {
            config,
            supervisor: ProcessSupervisor::new(),
            workspace,
        }
    }

    /// Run `job` for `frames` frames on the engine.
    ///
    /// Creates a fresh workspace (removing the previous one), writes the job
    /// file into it, and starts the engine as
    /// `<engine> <job-file> <frames> <workspace>`, killing any engine that is
    /// still running. Returns once the engine has been spawned.
    ///
    /// # Errors
    /// - [`Error::Workspace`](crate::Error::Workspace) if the workspace or
    ///   job file cannot be set up.
    /// - [`Error::JobEncoding`](crate::Error::JobEncoding) if `job` cannot
    ///   be serialized.
    /// - [`Error::Spawn`](crate::Error::Spawn) if the engine cannot start.
    pub fn submit<J>(&mut self, job: &J, frames: u32) -> Result<Submission>
    where
        J: Serialize + ?Sized,
    {
        // The old engine must be gone before its workspace is removed.
        if self.supervisor.current_pid().is_some() {
            self.supervisor.terminate();
        }

        let workspace = self.workspace.create()?;
        let job_file = write_job_file(&workspace, &self.config.job_file_name, job)?;

        let pid = self
            .supervisor
            .start(&self.config.engine, job_arguments(&job_file, frames, &workspace))?;

        Ok(Submission {
            pid,
            workspace,
            job_file,
        })
    }

    /// Ask the engine for its operation catalog.
    ///
    /// Runs the engine in query mode and blocks until it exits. Does not
    /// affect a running job.
    ///
    /// # Errors
    /// - [`Error::Spawn`](crate::Error::Spawn) /
    ///   [`Error::ProcessExit`](crate::Error::ProcessExit) if the query run
    ///   fails.
    /// - [`Error::Protocol`](crate::Error::Protocol) on any malformed
    ///   descriptor line.
    pub fn query_descriptors(&self) -> Result<DescriptorCatalog> {
        let stdout =
            ProcessSupervisor::capture_output(&self.config.engine, &self.config.query_args)?;
        let catalog = parse_catalog(&stdout)?;
        tracing::info!("Loaded {} descriptors", catalog.len());
        Ok(catalog)
    }

    /// Kill the running engine, if any.
    pub fn terminate(&mut self) -> Termination {
        self.supervisor.terminate()
    }

    /// Poll whether the running engine has exited on its own.
    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.supervisor.try_wait()
    }

    /// Block until the running engine exits.
    pub fn wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.supervisor.wait()
    }

    pub fn is_running(&mut self) -> bool {
        self.supervisor.is_running()
    }

    pub fn current_pid(&self) -> Option<u32> {
        self.supervisor.current_pid()
    }

    /// Path of the current workspace.
    pub fn workspace(&self) -> Option<&Path> {
        self.workspace.current()
    }

    /// Hand the current workspace over to the caller (it is not removed).
    pub fn detach_workspace(&mut self) -> Option<PathBuf> {
        self.workspace.detach()
    }

    /// Kill the engine and remove the workspace.
    pub fn shutdown(&mut self) -> Result<()> {
        self.supervisor.terminate();
        self.workspace.destroy()
    }
}
