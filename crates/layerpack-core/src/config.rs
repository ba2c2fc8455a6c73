//! Plugin configuration resolution
//!
//! Mirrors the option map the host deployment framework hands to the
//! packaging plugin. Field names are camelCase on the wire; unrecognized
//! options are ignored. The resolved value is immutable and passed by
//! reference to every component.

use crate::error::{LayerError, Result};
use crate::target::BuildTarget;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolved packaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    /// Name of the per-target requirements manifest, looked up inside
    /// each target's build directory
    pub requirements_file: String,

    /// Manifests applied to every target, in order, after its own
    pub global_requirements: Vec<PathBuf>,

    /// Paths copied into every target's build directory
    pub global_includes: Vec<PathBuf>,

    /// Root of the build tree. Required; resolution fails when empty
    pub build_dir: String,

    /// Name of the long-lived build container
    pub container_name: String,

    /// KEY=VALUE environment assignments injected into the container
    pub docker_envs: Vec<String>,

    /// Bind-mount `~/.ssh` into the container (for VCS-backed dependencies)
    #[serde(rename = "mountSSH")]
    pub mount_ssh: bool,

    /// Base image reference; derived from `runtime` when unset
    pub docker_image: Option<String>,

    /// Runtime identifier feeding the default image reference
    pub runtime: String,

    /// Route installer invocations through the build container
    pub use_docker: bool,

    /// Remove the build tree and stop the container after deploy
    pub cleanup: bool,

    /// Resolve ambiguous installer diagnostics to Abort without prompting
    pub abort_on_packaging_errors: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig {
            requirements_file: "requirements.txt".to_string(),
            global_requirements: vec![PathBuf::from("./requirements.txt")],
            global_includes: vec![PathBuf::from("./common")],
            build_dir: String::new(),
            container_name: "layerpack".to_string(),
            docker_envs: Vec::new(),
            mount_ssh: false,
            docker_image: None,
            runtime: "python3.12".to_string(),
            use_docker: false,
            cleanup: true,
            abort_on_packaging_errors: false,
        }
    }
}

impl PluginConfig {
    /// Enforce configuration invariants
    pub fn validate(&self) -> Result<()> {
        if self.build_dir.trim().is_empty() {
            return Err(LayerError::Config(
                "buildDir is required and must be non-empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective base image reference
    pub fn image(&self) -> String {
        self.docker_image
            .clone()
            .unwrap_or_else(|| format!("lambci/lambda:build-{}", self.runtime))
    }

    /// Build directory for one target
    pub fn target_build_dir(&self, target: &BuildTarget) -> PathBuf {
        Path::new(&self.build_dir).join(&target.name)
    }

    /// Artifact path for one target (`<buildDir>/<name>.zip`)
    pub fn target_artifact(&self, target: &BuildTarget) -> PathBuf {
        Path::new(&self.build_dir).join(format!("{}.zip", target.name))
    }
}

/// Project file: the configuration map plus the ordered target list
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFile {
    #[serde(flatten)]
    pub config: PluginConfig,

    #[serde(default)]
    pub targets: Vec<BuildTarget>,
}

impl ProjectFile {
    /// Load and validate a project file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let file: ProjectFile = serde_json::from_str(&text)?;
        file.config.validate()?;
        Ok(file)
    }
}
