//! Layerpack - dependency layer packaging CLI
//!
//! The `layerpack` command exposes the two lifecycle entry points of the
//! packaging core:
//!
//! - `package`: the before-packaging hook - brings the build environment
//!   up (when configured) and builds every target's layer artifact
//! - `clean`: the after-deploy hook - removes the build tree and tears
//!   down the build container

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use layerpack_core::{
    clean, init_tracing, CommandRunner, ConfirmGate, LayerBuildPipeline, PolicyGate, ProjectFile,
    Resolution, StdinGate,
};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "layerpack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Package per-function dependency layers", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every target's dependency layer artifact
    Package {
        /// Path to the project file (configuration + target list)
        #[arg(short, long, default_value = "layerpack.json")]
        config: PathBuf,

        /// Resolve ambiguous installer diagnostics to Abort without
        /// prompting (for unattended runs)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Remove the build tree and stop the build container
    Clean {
        /// Path to the project file (configuration + target list)
        #[arg(short, long, default_value = "layerpack.json")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Package {
            config,
            non_interactive,
        } => cmd_package(&config, non_interactive),
        Commands::Clean { config } => cmd_clean(&config),
    }
}

fn cmd_package(config_path: &Path, non_interactive: bool) -> Result<()> {
    let project = ProjectFile::load(config_path)
        .with_context(|| format!("failed to load project file {}", config_path.display()))?;

    if project.targets.is_empty() {
        info!("no targets configured, nothing to package");
        return Ok(());
    }

    // Unattended runs fail closed: ambiguous diagnostics abort instead
    // of blocking on input.
    let mut gate: Box<dyn ConfirmGate> =
        if non_interactive || project.config.abort_on_packaging_errors {
            Box::new(PolicyGate(Resolution::Abort))
        } else {
            Box::new(StdinGate)
        };
    let mut runner = CommandRunner::new(gate.as_mut());

    let pipeline = LayerBuildPipeline::new(&project.config);
    pipeline
        .run_all(&mut runner, &project.targets)
        .context("packaging run failed")?;

    info!("packaged {} target(s)", project.targets.len());
    Ok(())
}

fn cmd_clean(config_path: &Path) -> Result<()> {
    let project = ProjectFile::load(config_path)
        .with_context(|| format!("failed to load project file {}", config_path.display()))?;

    clean(&project.config);
    Ok(())
}
