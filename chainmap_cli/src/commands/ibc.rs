use crate::config::ChainmapCliConfig;
use abscissa_core::{config, Command, FrameworkError, Runnable};
use clap::Parser;
use std::path::PathBuf;

/// `ibc` subcommand
///
/// Builds only the IBC connectivity map, from the local mirror.
#[derive(Command, Debug, Default, Parser)]
pub struct IbcCmd {
    /// Only keep channels whose `status` tag matches, e.g. `live`
    #[clap(long)]
    pub status: Option<String>,

    /// Only keep channels tagged as preferred
    #[clap(long)]
    pub preferred: bool,

    /// Directory the map is written to
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Location of the local registry mirror
    #[clap(long)]
    pub registry_dir: Option<PathBuf>,
}

impl Runnable for IbcCmd {
    fn run(&self) {
        super::run_pipeline();
    }
}

impl config::Override<ChainmapCliConfig> for IbcCmd {
    fn override_config(
        &self,
        mut config: ChainmapCliConfig,
    ) -> Result<ChainmapCliConfig, FrameworkError> {
        let pipeline = &mut config.pipeline;

        pipeline.skip_sync = true;
        pipeline.process_chains = false;
        pipeline.process_ibc = true;
        if let Some(status) = &self.status {
            pipeline.channel_filter.status = Some(status.clone());
        }
        if self.preferred {
            pipeline.channel_filter.preferred = Some(true);
        }
        if let Some(dir) = &self.output_dir {
            pipeline.output.dir = dir.clone();
        }
        if let Some(dir) = &self.registry_dir {
            pipeline.registry.local_path = dir.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abscissa_core::config::Override;
    use assay::assay;

    #[assay]
    fn builds_only_the_ibc_map() {
        let cmd = IbcCmd {
            status: Some("live".to_string()),
            preferred: true,
            ..Default::default()
        };

        let config = cmd.override_config(ChainmapCliConfig::default()).unwrap();

        assert!(config.pipeline.skip_sync);
        assert!(!config.pipeline.process_chains);
        assert_eq!(config.pipeline.channel_filter.status.as_deref(), Some("live"));
        assert_eq!(config.pipeline.channel_filter.preferred, Some(true));
    }
}
