/// Contains models for serializing and deserializing `assetlist.json` for a given chain
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct AssetList {
    pub chain_name: String,
    pub assets: Vec<Asset>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Asset {
    #[serde(default)]
    pub description: Option<String>,
    pub denom_units: Vec<DenomUnit>,
    #[serde(default)]
    pub type_asset: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub base: String,
    pub name: String,
    pub display: String,
    pub symbol: String,
    #[serde(default)]
    pub traces: Option<Vec<Value>>,
    #[serde(default)]
    pub ibc: Option<Value>,
    #[serde(rename = "logo_URIs", default)]
    pub logo_uris: Option<LogoURIs>,
    #[serde(default)]
    pub images: Option<Vec<Value>>,
    #[serde(default)]
    pub coingecko_id: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DenomUnit {
    pub denom: String,
    pub exponent: i32,
    #[serde(default)]
    pub aliases: Option<Vec<String>>,
}

impl DenomUnit {
    /// Returns true if any alias of this unit, lower-cased, equals `denom`. Callers pass `denom`
    /// already lower-cased.
    pub fn has_alias(&self, denom: &str) -> bool {
        self.aliases
            .iter()
            .flatten()
            .any(|alias| alias.to_lowercase() == denom)
    }
}

/// Logo locations keyed by image format (`png`, `svg`, ...).
pub type LogoURIs = BTreeMap<String, String>;
