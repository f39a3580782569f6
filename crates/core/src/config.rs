use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Optional defaults read from a TOML file; command-line flags override them.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub warning: Option<u32>,
    pub critical: Option<u32>,
    pub path: Option<PathBuf>,
    pub extension: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        Ok(config)
    }
}
