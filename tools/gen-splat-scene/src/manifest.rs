//! Scene manifest parsing
//!
//! A manifest is a TOML file holding the base seed, per-layer overrides and
//! output settings. Every key is optional:
//!
//! ```toml
//! seed = 1337
//!
//! [curve_tube]
//! count = 7000
//! tube_radius = 0.35
//!
//! [warped_disk]
//! enabled = false
//!
//! [blob_clusters]
//! clusters = 4
//! seed_offset = 31
//!
//! [output]
//! path = "fixtures/scene_gaussians.json"
//! pretty = true
//! precision = 5
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use splatgen::SceneConfig;
use std::path::{Path, PathBuf};

use crate::export::WriteOptions;

/// Root manifest structure
#[derive(Debug, Default, Deserialize)]
pub struct SceneManifest {
    #[serde(flatten)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    #[serde(default)]
    pub precision: Option<u32>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            pretty: default_pretty(),
            precision: None,
        }
    }
}

impl OutputConfig {
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            pretty: self.pretty,
            precision: self.precision,
        }
    }
}

/// File the `scene` command writes when nothing else is given
pub fn default_output_path() -> PathBuf {
    PathBuf::from("scene_gaussians.json")
}

fn default_pretty() -> bool {
    true
}

/// Parse manifest text
pub fn parse_manifest(content: &str) -> Result<SceneManifest> {
    let manifest: SceneManifest =
        toml::from_str(content).context("Failed to parse scene manifest")?;
    manifest
        .output
        .write_options()
        .validate()
        .context("Invalid [output] section")?;
    Ok(manifest)
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<SceneManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("In manifest {:?}", path))
}
