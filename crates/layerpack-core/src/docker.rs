//! Build environment lifecycle
//!
//! Manages the long-lived Docker container that installer commands run
//! in. No container or image state is cached locally: the environment
//! can change out-of-band (an operator killing the container between
//! runs), so every decision re-queries the engine and acts on what it
//! finds.

use crate::config::PluginConfig;
use crate::error::{LayerError, Result};
use crate::runner::{execute, CommandRunner};
use tracing::{debug, info, warn};

/// Fixed in-container mount point for the working tree
pub const CONTAINER_WORKDIR: &str = "/var/task";

/// Build environment manager over the container engine CLI
pub struct DockerEnv<'a> {
    config: &'a PluginConfig,
}

impl<'a> DockerEnv<'a> {
    pub fn new(config: &'a PluginConfig) -> Self {
        DockerEnv { config }
    }

    /// Bring the isolated environment up: engine reachable, base image
    /// present, named container freshly started.
    pub fn ensure_ready(&self, runner: &mut CommandRunner) -> Result<()> {
        self.ensure_engine_reachable()?;
        self.ensure_image_present()?;
        self.ensure_container(runner)
    }

    /// Version probe; unreachable engine is structural and fatal.
    fn ensure_engine_reachable(&self) -> Result<()> {
        let probe = execute("docker", ["version"])?;
        if !probe.passed() {
            return Err(LayerError::Docker(format!(
                "container engine is not reachable: {}",
                probe.stderr.trim()
            )));
        }
        debug!("container engine reachable");
        Ok(())
    }

    /// Query locally installed images by exact reference; pull if absent.
    /// Pulls can take substantial wall-clock time; that is expected.
    fn ensure_image_present(&self) -> Result<()> {
        let image = self.config.image();
        let query = execute("docker", ["images", "-q", image.as_str()])?;

        if !query.stdout.trim().is_empty() {
            debug!("image {image} already present");
            return Ok(());
        }

        info!("pulling image {image} (this can take a while)");
        let pull = execute("docker", ["pull", image.as_str()])?;
        if !pull.passed() {
            return Err(LayerError::Docker(format!(
                "failed to pull {image}: {}",
                pull.stderr.trim()
            )));
        }
        info!("image {image} pulled");
        Ok(())
    }

    /// Query containers by exact name. An existing container is never
    /// assumed reusable (the working tree mount may have changed), so it
    /// is force-stopped and a fresh one is started in its place.
    fn ensure_container(&self, runner: &mut CommandRunner) -> Result<()> {
        let name = &self.config.container_name;

        let name_filter = format!("name=^{name}$");
        let query = execute(
            "docker",
            ["ps", "-a", "-q", "--filter", name_filter.as_str()],
        )?;
        if !query.stdout.trim().is_empty() {
            info!("container {name} exists, resetting it");
            runner.run("docker", ["stop", "-t", "0", name.as_str()])?;
        }

        let cwd = std::env::current_dir()?;
        let mut args: Vec<String> = vec![
            "run".into(),
            "-d".into(),
            "--rm".into(),
            "--name".into(),
            name.clone(),
            "-v".into(),
            format!("{}:{CONTAINER_WORKDIR}", cwd.display()),
        ];
        for assignment in &self.config.docker_envs {
            args.push("-e".into());
            args.push(assignment.clone());
        }
        if self.config.mount_ssh {
            if let Some(home) = dirs::home_dir() {
                args.push("-v".into());
                args.push(format!("{}/.ssh:/root/.ssh", home.display()));
            } else {
                warn!("mountSSH set but no home directory found, skipping SSH mount");
            }
        }
        args.push(self.config.image());
        // Keep the container alive for later `exec` calls.
        args.extend(["tail".into(), "-f".into(), "/dev/null".into()]);

        info!("starting container {name}");
        runner.run("docker", &args)?;
        Ok(())
    }

    /// Force-stop the named container with no grace period. Used by
    /// cleanup; failures are logged, never propagated.
    pub fn stop_container(&self) {
        let name = &self.config.container_name;
        match execute("docker", ["stop", "-t", "0", name.as_str()]) {
            Ok(result) if result.passed() => info!("container {name} stopped"),
            Ok(result) => warn!(
                "failed to stop container {name}: {}",
                result.stderr.trim()
            ),
            Err(e) => warn!("failed to stop container {name}: {e}"),
        }
    }
}
