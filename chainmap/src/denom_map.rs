//! Aggregation of normalized denom records into a single collision-checked map.
use crate::{
    denom::{self, DenomRecord, ReferenceDenom},
    diagnostics::Diagnostics,
    registry::assets::AssetList,
};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map::Entry, BTreeMap};

/// Denom records keyed by `<unit>_<chain>`. Entries are only ever added.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DenomMap {
    denoms: BTreeMap<String, DenomRecord>,
}

impl DenomMap {
    pub fn get(&self, key: &str) -> Option<&DenomRecord> {
        self.denoms.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.denoms.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.denoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.denoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DenomRecord)> {
        self.denoms.iter()
    }
}

/// Accumulates denom records chain by chain. The first record seen for a key wins.
#[derive(Debug)]
pub struct DenomMapBuilder {
    reference: ReferenceDenom,
    map: DenomMap,
    diagnostics: Diagnostics,
}

impl DenomMapBuilder {
    pub fn new(reference: ReferenceDenom) -> Self {
        DenomMapBuilder {
            reference,
            map: DenomMap::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Inserts a record unless its key is already taken. A rejected record is dropped and a
    /// warning naming the key and chain is recorded. Returns whether the record was accepted.
    pub fn insert(&mut self, record: DenomRecord) -> bool {
        match self.map.denoms.entry(record.key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            Entry::Occupied(existing) => {
                self.diagnostics.warning(
                    &record.chain_name,
                    &record.key,
                    format!(
                        "denom {} for the chain {} already exists (first seen for {})",
                        record.unit,
                        record.chain_name,
                        existing.get().name
                    ),
                );
                false
            }
        }
    }

    /// Normalizes every asset of `assets` and inserts the resulting records in order.
    /// Returns the number of records accepted for this chain.
    pub fn add_chain(&mut self, assets: &AssetList) -> usize {
        let records = denom::normalize_chain(assets, self.reference, &mut self.diagnostics);

        records
            .into_iter()
            .map(|record| self.insert(record))
            .filter(|accepted| *accepted)
            .count()
    }

    /// Number of records accepted so far.
    pub fn accepted(&self) -> usize {
        self.map.len()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn build(self) -> (DenomMap, Diagnostics) {
        (self.map, self.diagnostics)
    }
}

/// Builds a denom map from every asset list, in the order given.
pub fn build_denom_map(chains: &[AssetList], reference: ReferenceDenom) -> (DenomMap, Diagnostics) {
    let mut builder = DenomMapBuilder::new(reference);

    for chain in chains {
        builder.add_chain(chain);
    }

    builder.build()
}
