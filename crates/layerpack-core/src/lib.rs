//! Layerpack core - dependency layer packaging
//!
//! Packages per-function dependency bundles ("layers") by installing
//! language dependencies into per-target build directories and
//! compressing them into deployable zip artifacts. Provides:
//! - a reusable Docker build-environment lifecycle manager
//! - a command runner whose stderr is classified into ignore / fatal /
//!   ambiguous outcomes, with a synchronous operator confirmation gate
//!   for the ambiguous case
//! - the per-target build pipeline (directory setup, include copying,
//!   dependency installation, artifact compression) and cleanup

pub mod archive;
pub mod classify;
pub mod config;
pub mod docker;
pub mod error;
pub mod gate;
pub mod installer;
pub mod pipeline;
pub mod runner;
pub mod target;
pub mod telemetry;

// Re-export key types
pub use classify::{classify, Classification};
pub use config::{PluginConfig, ProjectFile};
pub use docker::DockerEnv;
pub use error::{LayerError, Result};
pub use gate::{ConfirmGate, PolicyGate, Resolution, StdinGate};
pub use installer::DependencyInstaller;
pub use pipeline::{clean, LayerBuildPipeline};
pub use runner::{execute, CommandRunner, ProcessResult};
pub use target::BuildTarget;
pub use telemetry::init_tracing;
