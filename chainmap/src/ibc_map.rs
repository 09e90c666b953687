//! Directed IBC connectivity graph: `chain -> port -> channel -> reachable chains`.
use crate::registry::paths::{ChannelEnd, ChannelFilter, IBCPath};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Finalized connectivity map, with every destination list sorted.
pub type IbcMap = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<String>>>>;

type Destinations = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// Mutable graph used while links are being added.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ConnectivityGraph {
    chains: BTreeMap<String, Destinations>,
}

impl ConnectivityGraph {
    /// Records that `to` is reachable from `from` over `port`/`channel`. Missing levels are
    /// created; inserting an already known destination is a no-op.
    pub fn insert(&mut self, from: &str, port: &str, channel: &str, to: &str) -> bool {
        self.chains
            .entry(from.to_string())
            .or_default()
            .entry(port.to_string())
            .or_default()
            .entry(channel.to_string())
            .or_default()
            .insert(to.to_string())
    }

    /// Chains reachable from `from` over `port`/`channel`.
    pub fn destinations(&self, from: &str, port: &str, channel: &str) -> Option<&BTreeSet<String>> {
        self.chains.get(from)?.get(port)?.get(channel)
    }

    /// Number of chains with at least one outbound channel.
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Converts every destination set into an ascending list.
    pub fn finalize(self) -> IbcMap {
        self.chains
            .into_iter()
            .map(|(chain, ports)| {
                let ports = ports
                    .into_iter()
                    .map(|(port, channels)| {
                        let channels = channels
                            .into_iter()
                            // sets iterate in ascending order
                            .map(|(channel, destinations)| {
                                (channel, destinations.into_iter().collect())
                            })
                            .collect();
                        (port, channels)
                    })
                    .collect();
                (chain, ports)
            })
            .collect()
    }
}

/// Adds IBC paths to a [`ConnectivityGraph`], both directions per channel.
#[derive(Debug, Default)]
pub struct IbcGraphBuilder {
    filter: ChannelFilter,
    graph: ConnectivityGraph,
    channels: usize,
}

impl IbcGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only channels accepted by `filter` contribute edges.
    pub fn with_filter(filter: ChannelFilter) -> Self {
        IbcGraphBuilder {
            filter,
            ..Default::default()
        }
    }

    pub fn add_link(&mut self, link: &IBCPath) {
        let chain_1 = link.chain_1.chain_name.as_str();
        let chain_2 = link.chain_2.chain_name.as_str();

        for channel in &link.channels {
            if !self.filter.accepts(channel) {
                continue;
            }
            self.add_direction(chain_1, &channel.chain_1, chain_2);
            self.add_direction(chain_2, &channel.chain_2, chain_1);
            self.channels += 1;
        }
    }

    fn add_direction(&mut self, from: &str, end: &ChannelEnd, to: &str) {
        self.graph.insert(from, &end.port_id, &end.channel_id, to);
    }

    /// Channel pairs that passed the filter.
    pub fn channel_count(&self) -> usize {
        self.channels
    }

    pub fn graph(&self) -> &ConnectivityGraph {
        &self.graph
    }

    pub fn build(self) -> IbcMap {
        self.graph.finalize()
    }
}

/// Builds the connectivity map for all paths.
pub fn build_ibc_map(links: &[IBCPath], filter: ChannelFilter) -> IbcMap {
    let mut builder = IbcGraphBuilder::with_filter(filter);

    for link in links {
        builder.add_link(link);
    }

    builder.build()
}
