//! `run` command: submit a job and supervise the engine until it exits.

use std::path::Path;
use std::time::Duration;

use zlaunch_core::{Job, Launcher, LauncherConfig};

/// How often the engine is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Submit `job_path` for `frames` frames and wait for the engine.
///
/// Ctrl-C kills the engine. The workspace is removed afterwards unless
/// `keep` is set.
pub async fn execute(
    config: LauncherConfig,
    job_path: &Path,
    frames: u32,
    keep: bool,
) -> anyhow::Result<()> {
    let job = Job::from_file(job_path)?;

    let mut launcher = Launcher::new(config);
    let submission = launcher.submit(&job, frames)?;
    println!("Workspace: {}", submission.workspace.display());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    let status = loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::warn!("Interrupted, killing engine");
                launcher.terminate();
                break None;
            }
            _ = ticker.tick() => {
                if let Some(status) = launcher.try_wait()? {
                    break Some(status);
                }
            }
        }
    };

    if keep {
        if let Some(workspace) = launcher.detach_workspace() {
            println!("Outputs kept in {}", workspace.display());
        }
    } else {
        launcher.shutdown()?;
    }

    match status {
        Some(status) if status.success() => {
            println!("Engine finished {} frames", frames);
            Ok(())
        }
        Some(status) => anyhow::bail!("Engine exited with {}", status),
        None => anyhow::bail!("Engine interrupted"),
    }
}
