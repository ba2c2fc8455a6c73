//! Build targets: the named units of packaging

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One layer to package. Enumerated once per run from the host
/// framework's target list and read-only for the duration of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTarget {
    /// Target name; also names the build directory and the artifact
    pub name: String,

    /// Paths copied into the build directory before installation
    #[serde(default)]
    pub includes: Vec<PathBuf>,

    /// Declared output artifact path, passed through to the host
    /// framework untouched
    #[serde(default)]
    pub artifact: Option<PathBuf>,

    /// Compatible runtime/architecture metadata, opaque to this core
    #[serde(default)]
    pub compat: serde_json::Value,
}

impl BuildTarget {
    /// Target with a name and no includes
    pub fn named(name: &str) -> Self {
        BuildTarget {
            name: name.to_string(),
            includes: Vec::new(),
            artifact: None,
            compat: serde_json::Value::Null,
        }
    }
}
