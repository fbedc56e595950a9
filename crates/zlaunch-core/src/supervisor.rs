//! Supervision of the engine child process.
//!
//! `ProcessSupervisor` tracks at most one running engine. Starting a new one
//! kills the previous child first, and the tracked handle is the only way to
//! terminate it. Children are killed outright; there is no shutdown
//! handshake with the engine.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::error::{Error, Result};

/// Outcome of [`ProcessSupervisor::terminate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A tracked child was sent SIGKILL and reaped.
    Killed { pid: u32 },
    /// Nothing was being tracked.
    NothingRunning,
}

/// The tracked engine process.
#[derive(Debug)]
struct TrackedChild {
    child: Child,
    /// Program name for log messages.
    program: String,
}

impl TrackedChild {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Kill and reap. Best effort: a child that already exited is fine.
    fn kill(mut self) {
        let pid = self.pid();
        if let Err(e) = self.child.kill() {
            // InvalidInput means the process was already reaped.
            if e.kind() != io::ErrorKind::InvalidInput {
                tracing::warn!("Failed to kill '{}' (pid {}): {}", self.program, pid, e);
            }
        }

        // Wait to reap zombie
        if let Err(e) = self.child.wait() {
            tracing::warn!("Failed to reap '{}' (pid {}): {}", self.program, pid, e);
        }
    }
}

/// Owner of the single tracked engine child.
#[derive(Debug, Default)]
pub struct ProcessSupervisor {
    current: Option<TrackedChild>,
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `program` with `args`, replacing any tracked child.
    ///
    /// The previous child is killed before the new one is spawned. Returns
    /// without waiting for the new child; stdout and stderr are inherited.
    ///
    /// # Errors
    /// Returns [`Error::Spawn`] if the executable cannot be launched. The old
    /// child is gone either way.
    pub fn start<I, S>(&mut self, program: &Path, args: I) -> Result<u32>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        if let Some(previous) = self.current.take() {
            tracing::info!("Killing previous engine (pid {})", previous.pid());
            previous.kill();
        }

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null());
        tracing::debug!("Spawning {:?}", command);

        let child = command.spawn().map_err(|source| Error::Spawn {
            program: program.display().to_string(),
            source,
        })?;

        let pid = child.id();
        tracing::info!("Engine started (pid {})", pid);
        self.current = Some(TrackedChild {
            child,
            program: program.display().to_string(),
        });
        Ok(pid)
    }

    /// Kill the tracked child, if any.
    ///
    /// With nothing tracked this logs and returns
    /// [`Termination::NothingRunning`]; it never fails.
    pub fn terminate(&mut self) -> Termination {
        match self.current.take() {
            Some(tracked) => {
                let pid = tracked.pid();
                tracked.kill();
                tracing::info!("Engine killed (pid {})", pid);
                Termination::Killed { pid }
            }
            None => {
                tracing::info!("Engine is not running");
                Termination::NothingRunning
            }
        }
    }

    /// Poll the tracked child without blocking.
    ///
    /// Returns the exit status once the child has exited on its own, at
    /// which point it is no longer tracked.
    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        let Some(tracked) = self.current.as_mut() else {
            return Ok(None);
        };

        match tracked.child.try_wait()? {
            Some(status) => {
                tracing::info!("Engine (pid {}) exited with {}", tracked.pid(), status);
                self.current = None;
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    /// Block until the tracked child exits. `None` if nothing is tracked.
    pub fn wait(&mut self) -> io::Result<Option<ExitStatus>> {
        let Some(mut tracked) = self.current.take() else {
            return Ok(None);
        };

        let status = tracked.child.wait()?;
        tracing::info!("Engine (pid {}) exited with {}", tracked.pid(), status);
        Ok(Some(status))
    }

    /// PID of the tracked child.
    pub fn current_pid(&self) -> Option<u32> {
        self.current.as_ref().map(TrackedChild::pid)
    }

    /// Whether a child is tracked and has not yet exited.
    ///
    /// If polling fails the child is still tracked, so it counts as running.
    pub fn is_running(&mut self) -> bool {
        if let Err(e) = self.try_wait() {
            tracing::warn!("Failed to poll engine: {}", e);
        }
        self.current.is_some()
    }

    /// Run `program` to completion and return its raw stdout.
    ///
    /// Blocks until the process exits. The process is not tracked, so it
    /// does not replace or affect a running job.
    ///
    /// # Errors
    /// - [`Error::Spawn`] if the executable cannot be launched.
    /// - [`Error::ProcessExit`] if it exits with a failure status.
    pub fn capture_output<I, S>(program: &Path, args: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::ProcessExit {
                program: program.display().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(output.stdout)
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        // Ensure the engine does not outlive its supervisor
        if let Some(tracked) = self.current.take() {
            tracked.kill();
        }
    }
}
