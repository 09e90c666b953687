//! Runs a complete pass: snapshot refresh, document loading, map building and export.
use crate::{
    config::PipelineConfig,
    denom_map::{DenomMap, DenomMapBuilder},
    diagnostics::{Diagnostic, Diagnostics, Severity},
    error::PipelineError,
    export::{self, ExportedFiles},
    ibc_map::{IbcGraphBuilder, IbcMap},
    registry::{
        loader,
        snapshot::{
            GitMirror, GithubRevisionSource, RevisionStore, SnapshotProvider, SnapshotStatus,
        },
    },
};
use tracing::{error, info, warn};

/// What a run did, for reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Upstream revision, when the snapshot was consulted.
    pub revision: Option<String>,
    /// True when the run stopped early because upstream did not change.
    pub skipped: bool,
    pub chains: usize,
    pub denoms: usize,
    pub ibc_files: usize,
    pub ibc_channels: usize,
    pub graph_chains: usize,
    pub denom_map_files: Option<ExportedFiles>,
    pub ibc_map_files: Option<ExportedFiles>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunSummary {
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    snapshot: Option<SnapshotProvider>,
}

impl Pipeline {
    /// Creates a pipeline that syncs from GitHub as described by `config.registry`, unless
    /// `skip_sync` is set.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let snapshot = if config.skip_sync {
            None
        } else {
            let registry = &config.registry;
            let source = GithubRevisionSource::new(
                &registry.api_url,
                &registry.owner,
                &registry.repo,
                &registry.branch,
            )?;
            let mirror = GitMirror::new(&registry.git_url, &registry.owner, &registry.repo)?;

            Some(SnapshotProvider::new(
                Box::new(source),
                Box::new(mirror),
                RevisionStore::new(registry.revision_file.clone()),
                registry.local_path.clone(),
            ))
        };

        Ok(Pipeline { config, snapshot })
    }

    /// Creates a pipeline around a caller supplied snapshot provider.
    pub fn with_snapshot(config: PipelineConfig, snapshot: Option<SnapshotProvider>) -> Self {
        Pipeline { config, snapshot }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary::default();

        let status = match &self.snapshot {
            Some(snapshot) => Some(snapshot.check(self.config.force).await?),
            None => None,
        };
        if let Some(status) = &status {
            summary.revision = Some(status.revision().to_string());

            if !status.is_changed() {
                info!("No new changes to process.");
                summary.skipped = true;
                return Ok(summary);
            }
        }

        let mut diagnostics = Diagnostics::new();

        if self.config.process_chains {
            info!("Processing chains...");
            let (map, chains, chain_diagnostics) = self.denom_map()?;
            diagnostics.extend(chain_diagnostics);

            summary.chains = chains;
            summary.denoms = map.len();
            summary.denom_map_files = Some(export::export_pair(
                &self.config.output.dir,
                &self.config.output.denom_map_name,
                &map,
            )?);
        }

        if self.config.process_ibc {
            info!("Processing IBC files...");
            let (map, files, channels) = self.ibc_map()?;

            summary.ibc_files = files;
            summary.ibc_channels = channels;
            summary.graph_chains = map.len();
            summary.ibc_map_files = Some(export::export_pair(
                &self.config.output.dir,
                &self.config.output.ibc_map_name,
                &map,
            )?);
        }

        // the revision only counts as processed once every map is written
        if let (Some(snapshot), Some(status)) = (&self.snapshot, &status) {
            snapshot.commit(status.revision()).await?;
        }

        summary.diagnostics = diagnostics.into_inner();
        Ok(summary)
    }

    /// Refreshes the registry mirror and records the new revision without building anything.
    /// Returns `None` when syncing is disabled.
    pub async fn sync(&self) -> Result<Option<SnapshotStatus>, PipelineError> {
        match &self.snapshot {
            Some(snapshot) => Ok(Some(snapshot.refresh(self.config.force).await?)),
            None => Ok(None),
        }
    }

    /// Loads every asset list of the local mirror and builds the denom map. Returns the map,
    /// the number of chains processed and the collected diagnostics. Diagnostics are also
    /// logged.
    pub fn denom_map(&self) -> Result<(DenomMap, usize, Diagnostics), PipelineError> {
        let chains = loader::load_asset_lists(
            &self.config.registry.local_path,
            &self.config.registry.exclude_dirs,
        )?;

        let mut builder = DenomMapBuilder::new(self.config.reference_denom);
        for chain in &chains {
            builder.add_chain(chain);
        }
        info!("Found {} denoms", builder.accepted());

        let (map, diagnostics) = builder.build();
        log_diagnostics(&diagnostics);

        Ok((map, chains.len(), diagnostics))
    }

    /// Loads every IBC path of the local mirror and builds the connectivity map. Returns the
    /// map, the number of path files and the number of channels that passed the filter.
    pub fn ibc_map(&self) -> Result<(IbcMap, usize, usize), PipelineError> {
        let links = loader::load_ibc_paths(&self.config.registry.local_path)?;

        let mut builder = IbcGraphBuilder::with_filter(self.config.channel_filter.to_filter());
        for link in &links {
            builder.add_link(link);
        }
        let channels = builder.channel_count();
        info!(
            "Mapped {} channels across {} chains",
            channels,
            builder.graph().chain_count()
        );

        Ok((builder.build(), links.len(), channels))
    }
}

/// Forwards each diagnostic to tracing at its own level.
pub fn log_diagnostics(diagnostics: &Diagnostics) {
    for d in diagnostics.iter() {
        match d.severity {
            Severity::Info => info!(chain = %d.chain, subject = %d.subject, "{}", d.message),
            Severity::Warning => warn!(chain = %d.chain, subject = %d.subject, "{}", d.message),
            Severity::Error => error!(chain = %d.chain, subject = %d.subject, "{}", d.message),
        }
    }
}
