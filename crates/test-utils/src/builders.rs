#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use globwatcher::config::{ConfigFile, ConfigSection, OutputConfig, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                output: BTreeMap::new(),
            },
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.config.root = Some(root.into());
        self
    }

    pub fn with_output(mut self, hash: &str, globs: &[&str]) -> Self {
        self.config.output.insert(
            hash.to_string(),
            OutputConfig {
                globs: globs.iter().map(|g| g.to_string()).collect(),
            },
        );
        self
    }

    /// The unvalidated config, for tests that expect validation to fail.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
