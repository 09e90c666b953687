//! ChainmapCli Subcommands

mod denoms;
mod ibc;
mod init;
mod run;
mod show;
mod sync;

use self::{
    denoms::DenomsCmd, ibc::IbcCmd, init::InitCmd, run::RunCmd, show::ShowCmd, sync::SyncCmd,
};
use crate::{config::ChainmapCliConfig, prelude::*};
use abscissa_core::{config::Override, Command, Configurable, FrameworkError, Runnable};
use chainmap::{Pipeline, RunSummary, Severity};
use clap::Parser;
use std::path::PathBuf;

/// Exit code used when diagnostics reach the configured `fail_on` severity.
pub const DIAGNOSTICS_EXIT_CODE: i32 = 2;

/// ChainmapCli Subcommands
/// Subcommands need to be listed in an enum.
#[derive(Command, Debug, Parser, Runnable)]
pub enum ChainmapCliCmd {
    /// Sync the registry mirror and rebuild both maps
    Run(RunCmd),
    /// Sync the registry mirror without building anything
    Sync(SyncCmd),
    /// Build the denom map from the local mirror
    Denoms(DenomsCmd),
    /// Build the IBC connectivity map from the local mirror
    Ibc(IbcCmd),
    /// Look up a record in an exported denom map
    Show(ShowCmd),
    /// Write a config file holding the default settings
    Init(InitCmd),
}

/// Entry point for the application. It needs to be a struct to allow using subcommands!
#[derive(Command, Debug, Parser)]
#[clap(author, about, version)]
pub struct EntryPoint {
    #[clap(subcommand)]
    cmd: ChainmapCliCmd,

    /// Enable verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Use the specified config file
    #[clap(short, long)]
    pub config: Option<String>,
}

impl Runnable for EntryPoint {
    fn run(&self) {
        self.cmd.run()
    }
}

/// This trait allows you to define how application configuration is loaded.
impl Configurable<ChainmapCliConfig> for EntryPoint {
    /// Location of the configuration file. An explicit `--config` must exist; the default
    /// file is optional and built-in defaults apply without it.
    fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(PathBuf::from(path));
        }

        crate::config::default_config_path().filter(|path| path.exists())
    }

    /// Apply changes to the config after it's been loaded, e.g. overriding
    /// values in a config file using command-line options.
    fn process_config(
        &self,
        config: ChainmapCliConfig,
    ) -> Result<ChainmapCliConfig, FrameworkError> {
        match &self.cmd {
            ChainmapCliCmd::Run(cmd) => cmd.override_config(config),
            ChainmapCliCmd::Sync(cmd) => cmd.override_config(config),
            ChainmapCliCmd::Denoms(cmd) => cmd.override_config(config),
            ChainmapCliCmd::Ibc(cmd) => cmd.override_config(config),
            _ => Ok(config),
        }
    }
}

/// Builds the pipeline from the loaded config, runs it and reports the outcome. Exits
/// non-zero on failure or when diagnostics reach the `fail_on` threshold.
pub(crate) fn run_pipeline() {
    let config = APP.config().pipeline.clone();

    let pipeline = Pipeline::new(config).unwrap_or_else(|err| {
        status_err!("invalid configuration: {}", err);
        std::process::exit(1);
    });

    let summary = abscissa_tokio::run(&APP, async { pipeline.run().await })
        .unwrap_or_else(|e| {
            status_err!("executor exited with error: {}", e);
            std::process::exit(1);
        })
        .unwrap_or_else(|err| {
            status_err!("{}", err);
            std::process::exit(1);
        });

    report(&summary);

    if summary
        .diagnostics
        .iter()
        .any(|d| pipeline.config().fails_on(d.severity))
    {
        status_err!("diagnostics reached the configured failure threshold");
        std::process::exit(DIAGNOSTICS_EXIT_CODE);
    }
}

fn report(summary: &RunSummary) {
    if let Some(revision) = &summary.revision {
        status_info!("Revision", "{}", revision);
    }
    if summary.skipped {
        status_ok!("Skipped", "no new changes to process");
        return;
    }

    if let Some(files) = &summary.denom_map_files {
        status_ok!(
            "Denoms",
            "{} denoms from {} chains written to {}",
            summary.denoms,
            summary.chains,
            files.pretty.display()
        );
    }
    if let Some(files) = &summary.ibc_map_files {
        status_ok!(
            "IBC",
            "{} channels across {} chains from {} files written to {}",
            summary.ibc_channels,
            summary.graph_chains,
            summary.ibc_files,
            files.pretty.display()
        );
    }

    let warnings = summary.count(Severity::Warning);
    let errors = summary.count(Severity::Error);
    if warnings > 0 || errors > 0 {
        status_warn!("{} warnings, {} errors", warnings, errors);
    }
}
