//! Dependency installation for one build target
//!
//! Locates applicable requirement manifests and invokes the installer,
//! either directly on the host or via `exec` into the running build
//! container. All paths are normalized to forward-slash form before
//! being handed to the installer.

use crate::config::PluginConfig;
use crate::docker::CONTAINER_WORKDIR;
use crate::error::Result;
use crate::runner::CommandRunner;
use std::path::{Component, Path};
use tracing::{debug, info, warn};

/// The external package installer
const INSTALLER: &str = "pip";

/// Installer front-end for one configuration
pub struct DependencyInstaller<'a> {
    config: &'a PluginConfig,
}

impl<'a> DependencyInstaller<'a> {
    pub fn new(config: &'a PluginConfig) -> Self {
        DependencyInstaller { config }
    }

    /// Install one manifest into the build directory.
    ///
    /// A missing manifest is a no-op; a zero-length manifest is treated
    /// as intentionally empty and skipped with a warning. Later installs
    /// into the same directory may overwrite earlier ones; that
    /// last-writer-wins accumulation is accepted.
    pub fn install(
        &self,
        runner: &mut CommandRunner,
        build_dir: &Path,
        manifest: &Path,
    ) -> Result<()> {
        if !manifest.exists() {
            debug!("no manifest at {}, skipping", manifest.display());
            return Ok(());
        }
        if std::fs::metadata(manifest)?.len() == 0 {
            warn!("manifest {} is empty, skipping", manifest.display());
            return Ok(());
        }

        info!(
            "installing {} into {}",
            manifest.display(),
            build_dir.display()
        );

        if self.config.use_docker {
            let cwd = std::env::current_dir()?;
            let target = container_path(&cwd, build_dir);
            let requirements = container_path(&cwd, manifest);
            runner.run(
                "docker",
                [
                    "exec",
                    self.config.container_name.as_str(),
                    INSTALLER,
                    "install",
                    "--upgrade",
                    "-t",
                    target.as_str(),
                    "-r",
                    requirements.as_str(),
                ],
            )?;
        } else {
            let target = posix_path(build_dir);
            let requirements = posix_path(manifest);
            runner.run(
                INSTALLER,
                [
                    "install",
                    "--upgrade",
                    "-t",
                    target.as_str(),
                    "-r",
                    requirements.as_str(),
                ],
            )?;
        }
        Ok(())
    }
}

/// Forward-slash rendering of a path, dropping `.` components
pub(crate) fn posix_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::RootDir | Component::CurDir | Component::Prefix(_) => None,
        })
        .collect();
    let joined = parts.join("/");
    if path.is_absolute() {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Rewrite a host path to its in-container equivalent under the working
/// tree mount. Absolute paths are made relative to the working tree
/// first; paths outside it are kept as-is below the mount point.
pub(crate) fn container_path(cwd: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(cwd).unwrap_or(path);
    let rel = posix_path(rel);
    if rel.is_empty() {
        CONTAINER_WORKDIR.to_string()
    } else {
        format!("{CONTAINER_WORKDIR}/{rel}")
    }
}
