use crate::config::ChainmapCliConfig;
use abscissa_core::{config, Command, FrameworkError, Runnable};
use chainmap::{ReferenceDenom, Severity};
use clap::Parser;
use std::path::PathBuf;

/// `run` subcommand
///
/// Syncs the registry mirror when upstream moved, then rebuilds and exports both maps.
#[derive(Command, Debug, Default, Parser)]
pub struct RunCmd {
    /// Process the mirror even if upstream did not change
    #[clap(short, long)]
    pub force: bool,

    /// Use the local mirror as is, without contacting upstream
    #[clap(long)]
    pub skip_sync: bool,

    /// Do not build the denom map
    #[clap(long)]
    pub no_chains: bool,

    /// Do not build the IBC map
    #[clap(long)]
    pub no_ibc: bool,

    /// Unit decimals are measured against: `display` or `base`
    #[clap(long)]
    pub reference: Option<ReferenceDenom>,

    /// Directory the maps are written to
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Location of the local registry mirror
    #[clap(long)]
    pub registry_dir: Option<PathBuf>,

    /// Exit with an error when a diagnostic of this severity or above is reported
    #[clap(long)]
    pub fail_on: Option<Severity>,
}

impl Runnable for RunCmd {
    fn run(&self) {
        super::run_pipeline();
    }
}

impl config::Override<ChainmapCliConfig> for RunCmd {
    fn override_config(
        &self,
        mut config: ChainmapCliConfig,
    ) -> Result<ChainmapCliConfig, FrameworkError> {
        let pipeline = &mut config.pipeline;

        pipeline.force |= self.force;
        pipeline.skip_sync |= self.skip_sync;
        if self.no_chains {
            pipeline.process_chains = false;
        }
        if self.no_ibc {
            pipeline.process_ibc = false;
        }
        if let Some(reference) = self.reference {
            pipeline.reference_denom = reference;
        }
        if let Some(dir) = &self.output_dir {
            pipeline.output.dir = dir.clone();
        }
        if let Some(dir) = &self.registry_dir {
            pipeline.registry.local_path = dir.clone();
        }
        if self.fail_on.is_some() {
            pipeline.fail_on = self.fail_on;
        }

        Ok(config)
    }
}
