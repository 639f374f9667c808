// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// root = "."
///
/// [output."3f2a9c"]
/// globs = ["my-pkg/dist/**", "my-pkg/.next/**"]
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Global settings from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Output sets from `[output.<hash>]`, keyed by cache key.
    #[serde(default)]
    pub output: BTreeMap<String, OutputConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigSection {
    /// Repository root all globs are anchored at.
    ///
    /// Relative paths are resolved against the config file's directory.
    /// When omitted, that directory itself is the root.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// `[output.<hash>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root-relative output globs, in the order they should be reported.
    pub globs: Vec<String>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub output: BTreeMap<String, OutputConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        output: BTreeMap<String, OutputConfig>,
    ) -> Self {
        Self { config, output }
    }

    pub fn outputs(&self) -> &BTreeMap<String, OutputConfig> {
        &self.output
    }

    /// Resolve the repository root given the directory holding the config.
    pub fn resolve_root(&self, config_dir: &Path) -> PathBuf {
        match &self.config.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => config_dir.join(root),
            None => config_dir.to_path_buf(),
        }
    }
}
