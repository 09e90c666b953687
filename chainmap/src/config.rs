use crate::{
    denom::ReferenceDenom,
    diagnostics::Severity,
    error::ConfigError,
    registry::{
        loader,
        paths::{ChannelFilter, Tag},
        snapshot::{DEFAULT_GITHUB_API_URL, DEFAULT_GITHUB_URL},
    },
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the registry comes from and where the local mirror lives.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_url: String,
    pub git_url: String,
    /// Local mirror of the registry.
    pub local_path: PathBuf,
    /// File holding the revision processed by the previous run.
    pub revision_file: PathBuf,
    pub exclude_dirs: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            owner: "cosmos".to_string(),
            repo: "chain-registry".to_string(),
            branch: "master".to_string(),
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            git_url: DEFAULT_GITHUB_URL.to_string(),
            local_path: PathBuf::from("./chain-registry"),
            revision_file: PathBuf::from("commit_id.json"),
            exclude_dirs: loader::default_exclude_dirs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub denom_map_name: String,
    pub ibc_map_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("."),
            denom_map_name: "denom_map".to_string(),
            ibc_map_name: "ibc_map".to_string(),
        }
    }
}

/// Restricts which IBC channels contribute to the connectivity map.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelFilterConfig {
    pub status: Option<String>,
    pub preferred: Option<bool>,
    pub dex: Option<String>,
    pub properties: Option<String>,
}

impl ChannelFilterConfig {
    pub fn to_filter(&self) -> ChannelFilter {
        let mut tags = Vec::new();
        if let Some(status) = &self.status {
            tags.push(Tag::Status(status.clone()));
        }
        if let Some(preferred) = self.preferred {
            tags.push(Tag::Preferred(preferred));
        }
        if let Some(dex) = &self.dex {
            tags.push(Tag::Dex(dex.clone()));
        }
        if let Some(properties) = &self.properties {
            tags.push(Tag::Properties(properties.clone()));
        }

        ChannelFilter::new(tags)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub registry: RegistryConfig,
    pub output: OutputConfig,
    pub reference_denom: ReferenceDenom,
    pub channel_filter: ChannelFilterConfig,
    pub process_chains: bool,
    pub process_ibc: bool,
    /// Process the local mirror even if upstream did not move.
    pub force: bool,
    /// Do not contact upstream at all; use the local mirror as is.
    pub skip_sync: bool,
    /// Lowest diagnostic severity that should fail the run.
    pub fail_on: Option<Severity>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            registry: RegistryConfig::default(),
            output: OutputConfig::default(),
            reference_denom: ReferenceDenom::Display,
            channel_filter: ChannelFilterConfig::default(),
            process_chains: true,
            process_ibc: true,
            force: false,
            skip_sync: false,
            fail_on: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(s)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileIO {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.denom_map_name.is_empty() || self.output.ibc_map_name.is_empty() {
            return Err(ConfigError::Invalid(
                "output file names must not be empty".to_string(),
            ));
        }
        if self.output.denom_map_name == self.output.ibc_map_name {
            return Err(ConfigError::Invalid(format!(
                "denom map and IBC map would both be written to {}",
                self.output.denom_map_name
            )));
        }
        if !self.process_chains && !self.process_ibc {
            return Err(ConfigError::Invalid(
                "nothing to do: both process_chains and process_ibc are disabled".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns true if `severity` is at or above the configured failure threshold.
    pub fn fails_on(&self, severity: Severity) -> bool {
        self.fail_on.map_or(false, |threshold| severity >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;

    #[assay]
    fn defaults_match_upstream_registry() {
        let config = PipelineConfig::default();

        assert_eq!(config.registry.owner, "cosmos");
        assert_eq!(config.registry.repo, "chain-registry");
        assert_eq!(config.registry.branch, "master");
        assert_eq!(config.registry.exclude_dirs, vec![".git", ".github", "_template"]);
        assert_eq!(config.reference_denom, ReferenceDenom::Display);
        assert!(config.process_chains && config.process_ibc);
        assert!(config.validate().is_ok());
    }

    #[assay]
    fn parses_partial_toml() {
        let config = PipelineConfig::from_toml_str(
            r#"
            reference_denom = "base"
            fail_on = "warning"
            process_ibc = false

            [output]
            dir = "out"

            [channel_filter]
            status = "live"
            "#,
        )
        .unwrap();

        assert_eq!(config.reference_denom, ReferenceDenom::Base);
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.output.denom_map_name, "denom_map");
        assert!(!config.process_ibc);
        assert!(config.fails_on(Severity::Error));
        assert!(config.fails_on(Severity::Warning));
        assert!(!config.fails_on(Severity::Info));
        assert_eq!(
            config.channel_filter.to_filter(),
            ChannelFilter::new(vec![Tag::Status("live".to_string())])
        );
    }

    #[assay]
    fn rejects_conflicting_output_names() {
        let result = PipelineConfig::from_toml_str(
            r#"
            [output]
            denom_map_name = "maps"
            ibc_map_name = "maps"
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[assay]
    fn rejects_unknown_keys() {
        let result = PipelineConfig::from_toml_str("colour = \"blue\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
