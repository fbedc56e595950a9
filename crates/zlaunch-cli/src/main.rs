//! zlaunch CLI - launch jobs on the computation engine and list its operations.

mod descriptors;
mod engine;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "zlaunch")]
#[command(about = "Launch jobs on the computation engine and query its operations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine executable (overrides config and ZLAUNCH_ENGINE)
    #[arg(long, global = true)]
    engine: Option<PathBuf>,

    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the operations the engine provides
    Descriptors {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a job file on the engine and wait for it to finish
    Run {
        /// Path to the job (.json file)
        job: PathBuf,

        /// Number of frames to compute
        #[arg(short, long, default_value = "1")]
        frames: u32,

        /// Keep the workspace directory after the engine exits
        #[arg(long)]
        keep: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = engine::resolve_config(cli.engine, cli.config.as_deref())?;

    match cli.command {
        Commands::Descriptors { json } => descriptors::execute(config, json)?,

        Commands::Run { job, frames, keep } => {
            run::execute(config, &job, frames, keep).await?;
        }
    }

    Ok(())
}
