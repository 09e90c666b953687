//! Derives a flat denom map and an IBC connectivity map from the Cosmos chain registry.
pub use error::PipelineError;

pub mod config;
pub mod denom;
pub mod denom_map;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod ibc_map;
pub mod pipeline;
pub mod registry;

pub use self::{
    config::PipelineConfig,
    denom::{denom_key, DenomRecord, ReferenceDenom},
    denom_map::{build_denom_map, DenomMap, DenomMapBuilder},
    diagnostics::{Diagnostic, Diagnostics, Severity},
    ibc_map::{build_ibc_map, ConnectivityGraph, IbcGraphBuilder, IbcMap},
    pipeline::{Pipeline, RunSummary},
};
