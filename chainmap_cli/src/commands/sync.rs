use crate::{config::ChainmapCliConfig, prelude::*};
use abscissa_core::{config, Command, FrameworkError, Runnable};
use chainmap::{registry::snapshot::SnapshotStatus, Pipeline};
use clap::Parser;

/// `sync` subcommand
///
/// Brings the local registry mirror up to date without building any map.
#[derive(Command, Debug, Parser)]
pub struct SyncCmd {
    /// Sync even if the recorded revision matches upstream
    #[clap(short, long)]
    pub force: bool,
}

impl Runnable for SyncCmd {
    fn run(&self) {
        let mut config = APP.config().pipeline.clone();
        config.skip_sync = false;

        let pipeline = Pipeline::new(config).unwrap_or_else(|err| {
            status_err!("invalid configuration: {}", err);
            std::process::exit(1);
        });

        let status = abscissa_tokio::run(&APP, async { pipeline.sync().await })
            .unwrap_or_else(|e| {
                status_err!("executor exited with error: {}", e);
                std::process::exit(1);
            })
            .unwrap_or_else(|err| {
                status_err!("sync failed: {}", err);
                std::process::exit(1);
            });

        match status {
            Some(SnapshotStatus::Changed { revision }) => status_ok!(
                "Synced",
                "{} at {}",
                pipeline.config().registry.local_path.display(),
                revision
            ),
            Some(SnapshotStatus::Unchanged { revision }) => {
                status_ok!("Current", "already at {}", revision)
            }
            None => status_warn!("syncing is disabled"),
        }
    }
}

impl config::Override<ChainmapCliConfig> for SyncCmd {
    fn override_config(
        &self,
        mut config: ChainmapCliConfig,
    ) -> Result<ChainmapCliConfig, FrameworkError> {
        config.pipeline.force |= self.force;

        Ok(config)
    }
}
