// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{GlobWatchError, Result};
use crate::watch::patterns::compile_all;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::GlobWatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.output))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_outputs(cfg)?;
    validate_outputs(cfg)?;
    Ok(())
}

fn ensure_has_outputs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.output.is_empty() {
        return Err(GlobWatchError::ConfigError(
            "config must contain at least one [output.<hash>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_outputs(cfg: &RawConfigFile) -> Result<()> {
    for (hash, output) in cfg.output.iter() {
        if hash.trim().is_empty() {
            return Err(GlobWatchError::ConfigError(
                "output hash must not be blank".to_string(),
            ));
        }
        if output.globs.is_empty() {
            return Err(GlobWatchError::ConfigError(format!(
                "output '{}' must list at least one glob",
                hash
            )));
        }
        // Surface pattern errors at load time rather than at registration.
        compile_all(&output.globs)?;
    }
    Ok(())
}
