//! ChainmapCli Config
//!
//! The file is looked up at `~/.chainmap/config.toml` unless `--config` points
//! elsewhere. Every key is optional.
use crate::error::Error;
use abscissa_core::tracing::debug;
use chainmap::config::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// ChainmapCli Configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainmapCliConfig {
    /// Registry, output and processing options
    pub pipeline: PipelineConfig,
}

/// Builds the config path in the user's home directory
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".chainmap");
    path.push("config.toml");

    Some(path)
}

/// Writes a config file holding the default settings to `path`. Existing files are
/// only replaced when `overwrite` is set.
pub fn init(path: &PathBuf, overwrite: bool) -> Result<bool, Error> {
    if path.exists() && !overwrite {
        debug!("config file {} already exists", path.display());
        return Ok(false);
    }

    if let Some(config_dir) = path.parent() {
        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            debug!("creating config directory {}", config_dir.display());
            fs::create_dir_all(config_dir)?;
        }
    }

    // tables have to follow plain values, which `toml::Value` orders for us
    let config_content = toml::to_string(&toml::Value::try_from(ChainmapCliConfig::default())?)?;
    fs::write(path, config_content)?;

    Ok(true)
}
