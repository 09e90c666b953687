use crate::config::ChainmapCliConfig;
use abscissa_core::{config, Command, FrameworkError, Runnable};
use chainmap::ReferenceDenom;
use clap::Parser;
use std::path::PathBuf;

/// `denoms` subcommand
///
/// Builds only the denom map, from the local mirror.
#[derive(Command, Debug, Default, Parser)]
pub struct DenomsCmd {
    /// Unit decimals are measured against: `display` or `base`
    #[clap(long)]
    pub reference: Option<ReferenceDenom>,

    /// Directory the map is written to
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Location of the local registry mirror
    #[clap(long)]
    pub registry_dir: Option<PathBuf>,
}

impl Runnable for DenomsCmd {
    fn run(&self) {
        super::run_pipeline();
    }
}

impl config::Override<ChainmapCliConfig> for DenomsCmd {
    fn override_config(
        &self,
        mut config: ChainmapCliConfig,
    ) -> Result<ChainmapCliConfig, FrameworkError> {
        let pipeline = &mut config.pipeline;

        pipeline.skip_sync = true;
        pipeline.process_chains = true;
        pipeline.process_ibc = false;
        if let Some(reference) = self.reference {
            pipeline.reference_denom = reference;
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
