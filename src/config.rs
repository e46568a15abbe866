//! Runtime settings.
//!
//! Settings come from an optional YAML file; command-line flags override
//! individual values. Nothing below the CLI reads the environment.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::validator::ValidationPolicy;

pub const DEFAULT_SCHEMES_DIR: &str = "schemes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schemes_dir: PathBuf,
    pub policy: ValidationPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schemes_dir: PathBuf::from(DEFAULT_SCHEMES_DIR),
            policy: ValidationPolicy::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening settings file {path:?}"))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).context("Parsing settings YAML")
    }

    /// Layers explicit overrides on top of the settings file (or defaults).
    pub fn resolve(
        config: Option<&Path>,
        schemes_dir: Option<PathBuf>,
        policy: Option<ValidationPolicy>,
    ) -> Result<Self> {
        let mut settings = match config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(dir) = schemes_dir {
            settings.schemes_dir = dir;
        }
        if let Some(policy) = policy {
            settings.policy = policy;
        }
        Ok(settings)
    }
}
