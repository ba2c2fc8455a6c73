//! Per-target build pipeline and cleanup
//!
//! For each target: create the build directory, copy declared and
//! global includes into it, install every applicable manifest, then
//! compress the directory into the layer artifact. Targets are built
//! sequentially in list order; the named build container is a single
//! shared execution context, so there is no concurrent build path.

use crate::archive::zip_directory;
use crate::config::PluginConfig;
use crate::docker::DockerEnv;
use crate::error::Result;
use crate::installer::DependencyInstaller;
use crate::runner::CommandRunner;
use crate::target::BuildTarget;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Builds one layer artifact per target
pub struct LayerBuildPipeline<'a> {
    config: &'a PluginConfig,
}

impl<'a> LayerBuildPipeline<'a> {
    pub fn new(config: &'a PluginConfig) -> Self {
        LayerBuildPipeline { config }
    }

    /// Ensure the build environment is ready, then build every target in
    /// list order. A fatal error or operator abort on any target halts
    /// all remaining targets; completed artifacts are left in place.
    pub fn run_all(&self, runner: &mut CommandRunner, targets: &[BuildTarget]) -> Result<()> {
        if self.config.use_docker {
            DockerEnv::new(self.config).ensure_ready(runner)?;
        }

        for target in targets {
            self.build(runner, target)?;
        }
        Ok(())
    }

    /// Build one target: directory setup, include copying, dependency
    /// installation, artifact compression. All failures are fatal.
    pub fn build(&self, runner: &mut CommandRunner, target: &BuildTarget) -> Result<PathBuf> {
        info!("packaging target {}", target.name);

        let build_dir = self.config.target_build_dir(target);
        std::fs::create_dir_all(&build_dir)?;

        for include in target.includes.iter().chain(&self.config.global_includes) {
            if include.exists() {
                copy_into(include, &build_dir)?;
            } else {
                // Not every target declares includes that exist.
                debug!("include {} does not exist, skipping", include.display());
            }
        }

        let installer = DependencyInstaller::new(self.config);
        let own_manifest = build_dir.join(&self.config.requirements_file);
        installer.install(runner, &build_dir, &own_manifest)?;
        for manifest in &self.config.global_requirements {
            installer.install(runner, &build_dir, manifest)?;
        }

        let artifact = self.config.target_artifact(target);
        zip_directory(&build_dir, &artifact)?;

        info!("target {} packaged to {}", target.name, artifact.display());
        Ok(artifact)
    }
}

/// Remove the build tree and tear down the build container.
///
/// Runs at a separate lifecycle point from the build. Failures here are
/// logged, never propagated: cleanup must not fail the overall
/// operation.
pub fn clean(config: &PluginConfig) {
    if !config.cleanup {
        info!("cleanup disabled, leaving build directory and container in place");
        return;
    }

    let build_dir = Path::new(&config.build_dir);
    if build_dir.exists() {
        match std::fs::remove_dir_all(build_dir) {
            Ok(()) => info!("removed build directory {}", build_dir.display()),
            Err(e) => warn!(
                "failed to remove build directory {}: {e}",
                build_dir.display()
            ),
        }
    }

    if config.use_docker {
        DockerEnv::new(config).stop_container();
    }
}

/// Copy `src` (file or directory, recursively) into `dest_dir`, keeping
/// its own name: `./common` lands at `<dest_dir>/common`.
fn copy_into(src: &Path, dest_dir: &Path) -> Result<()> {
    let name = match src.file_name() {
        Some(name) => name,
        None => return Ok(()),
    };
    let dest = dest_dir.join(name);

    if src.is_dir() {
        copy_tree(src, &dest)?;
    } else {
        std::fs::copy(src, &dest)?;
    }
    debug!("copied {} to {}", src.display(), dest.display());
    Ok(())
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let target = dest.join(entry.file_name());
        if path.is_dir() {
            copy_tree(&path, &target)?;
        } else {
            std::fs::copy(&path, &target)?;
        }
    }
    Ok(())
}
