//! Per-chain asset normalization.
//!
//! Every asset is resolved against its reference denomination (the `display` unit unless
//! configured otherwise) and expanded into one [`DenomRecord`] per declared unit, carrying the
//! decimal offset between that unit and the reference unit.
use crate::{
    diagnostics::Diagnostics,
    registry::assets::{Asset, AssetList, DenomUnit, LogoURIs},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Which asset field names the unit that offsets are computed against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceDenom {
    #[default]
    Display,
    Base,
}

impl ReferenceDenom {
    fn select<'a>(&self, asset: &'a Asset) -> &'a str {
        match self {
            ReferenceDenom::Display => asset.display.as_str(),
            ReferenceDenom::Base => asset.base.as_str(),
        }
    }
}

impl fmt::Display for ReferenceDenom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceDenom::Display => write!(f, "display"),
            ReferenceDenom::Base => write!(f, "base"),
        }
    }
}

impl FromStr for ReferenceDenom {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "display" => Ok(ReferenceDenom::Display),
            "base" => Ok(ReferenceDenom::Base),
            other => Err(format!(
                "unknown reference denom '{}', expected 'display' or 'base'",
                other
            )),
        }
    }
}

/// One denomination unit of one asset on one chain.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DenomRecord {
    #[serde(skip)]
    pub key: String,
    #[serde(rename = "denom")]
    pub unit: String,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "decimals")]
    pub decimals_offset: i64,
    #[serde(rename = "chain")]
    pub chain_name: String,
    pub description: Option<String>,
    pub aliases: Option<Vec<String>>,
    pub type_asset: Option<String>,
    pub address: Option<String>,
    pub traces: Option<Vec<Value>>,
    pub ibc: Option<Value>,
    #[serde(rename = "logo_URIs")]
    pub logo_uris: Option<LogoURIs>,
    pub images: Option<Vec<Value>>,
    pub coingecko_id: Option<String>,
    pub keywords: Option<Vec<String>>,
}

impl DenomRecord {
    fn new(chain_name: &str, asset: &Asset, unit: &DenomUnit, decimals_offset: i64) -> Self {
        DenomRecord {
            key: denom_key(&unit.denom, chain_name),
            unit: unit.denom.clone(),
            name: asset.name.clone(),
            symbol: asset.symbol.clone(),
            decimals_offset,
            chain_name: chain_name.to_string(),
            description: asset.description.clone(),
            aliases: unit.aliases.clone(),
            type_asset: asset.type_asset.clone(),
            address: asset.address.clone(),
            traces: asset.traces.clone(),
            ibc: asset.ibc.clone(),
            logo_uris: asset.logo_uris.clone(),
            images: asset.images.clone(),
            coingecko_id: asset.coingecko_id.clone(),
            keywords: asset.keywords.clone(),
        }
    }
}

/// Builds the `<unit>_<chain>` map key. The unit is lower-cased, the chain name is not.
pub fn denom_key(unit: &str, chain_name: &str) -> String {
    format!("{}_{}", unit.to_lowercase(), chain_name)
}

/// Expands one asset into its denom records.
///
/// Returns an empty vec when the asset declares no units, or when its reference denomination
/// matches neither a unit nor a unit alias. The latter is reported as an error diagnostic.
pub fn normalize_asset(
    chain_name: &str,
    asset: &Asset,
    reference: ReferenceDenom,
    diagnostics: &mut Diagnostics,
) -> Vec<DenomRecord> {
    if asset.denom_units.is_empty() {
        return Vec::new();
    }

    // later units with the same lower-cased symbol replace earlier ones in place
    let units: IndexMap<String, &DenomUnit> = asset
        .denom_units
        .iter()
        .map(|unit| (unit.denom.to_lowercase(), unit))
        .collect();

    let wanted = reference.select(asset);
    let wanted_lower = wanted.to_lowercase();

    let reference_unit = match units.get(&wanted_lower) {
        Some(unit) => *unit,
        None => match asset
            .denom_units
            .iter()
            .find(|unit| unit.has_alias(&wanted_lower))
        {
            Some(unit) => {
                diagnostics.info(
                    chain_name,
                    &asset.name,
                    format!(
                        "found alias {} for {} on {} (unit {})",
                        wanted, asset.name, chain_name, unit.denom
                    ),
                );
                unit
            }
            None => {
                diagnostics.error(
                    chain_name,
                    &asset.name,
                    format!(
                        "{} denom {} not found in denom_units for {} on {}",
                        reference, wanted, asset.name, chain_name
                    ),
                );
                return Vec::new();
            }
        },
    };

    let reference_exponent = i64::from(reference_unit.exponent);

    units
        .values()
        .map(|unit| {
            let offset = reference_exponent - i64::from(unit.exponent);
            DenomRecord::new(chain_name, asset, unit, offset)
        })
        .collect()
}

/// Normalizes every asset of a chain, in declaration order.
pub fn normalize_chain(
    assets: &AssetList,
    reference: ReferenceDenom,
    diagnostics: &mut Diagnostics,
) -> Vec<DenomRecord> {
    assets
        .assets
        .iter()
        .flat_map(|asset| normalize_asset(&assets.chain_name, asset, reference, diagnostics))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use assay::assay;

    pub(crate) fn unit(denom: &str, exponent: i32) -> DenomUnit {
        DenomUnit {
            denom: denom.to_string(),
            exponent,
            aliases: None,
        }
    }

    pub(crate) fn asset(base: &str, display: &str, units: Vec<DenomUnit>) -> Asset {
        Asset {
            denom_units: units,
            base: base.to_string(),
            name: format!("{} token", display),
            display: display.to_string(),
            symbol: display.to_uppercase(),
            ..Default::default()
        }
    }

    fn by_key(records: &[DenomRecord], key: &str) -> DenomRecord {
        records
            .iter()
            .find(|r| r.key == key)
            .cloned()
            .unwrap_or_else(|| panic!("missing record {}", key))
    }

    #[assay]
    fn atom_offsets() {
        let atom = asset("uatom", "atom", vec![unit("uatom", 0), unit("atom", 6)]);
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("cosmoshub", &atom, ReferenceDenom::Display, &mut diagnostics);

        assert_eq!(records.len(), 2);
        assert_eq!(by_key(&records, "uatom_cosmoshub").decimals_offset, 6);
        assert_eq!(by_key(&records, "atom_cosmoshub").decimals_offset, 0);
        assert!(diagnostics.is_empty());
    }

    #[assay]
    fn display_match_ignores_case() {
        let token = asset("uTOK", "Tok", vec![unit("uTOK", 0), unit("TOK", 6)]);
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("chain", &token, ReferenceDenom::Display, &mut diagnostics);

        let display = by_key(&records, "tok_chain");
        assert_eq!(display.decimals_offset, 0);
        // original casing is kept on the record itself
        assert_eq!(display.unit, "TOK");
        assert_eq!(by_key(&records, "utok_chain").decimals_offset, 6);
    }

    #[assay]
    fn offsets_can_be_negative() {
        let token = asset(
            "utok",
            "mtok",
            vec![unit("utok", 0), unit("mtok", 3), unit("tok", 6)],
        );
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("chain", &token, ReferenceDenom::Display, &mut diagnostics);

        assert_eq!(by_key(&records, "utok_chain").decimals_offset, 3);
        assert_eq!(by_key(&records, "mtok_chain").decimals_offset, 0);
        assert_eq!(by_key(&records, "tok_chain").decimals_offset, -3);
    }

    #[assay]
    fn resolves_display_through_alias() {
        let mut display = unit("atom", 6);
        display.aliases = Some(vec!["ATOMS".to_string()]);
        let mut base = unit("uatom", 0);
        base.aliases = Some(vec!["microatom".to_string()]);
        let atom = asset("uatom", "atoms", vec![base, display]);
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("cosmoshub", &atom, ReferenceDenom::Display, &mut diagnostics);

        assert_eq!(by_key(&records, "atom_cosmoshub").decimals_offset, 0);
        let base = by_key(&records, "uatom_cosmoshub");
        assert_eq!(base.decimals_offset, 6);
        // each record carries its own unit's aliases
        assert_eq!(base.aliases, Some(vec!["microatom".to_string()]));

        let events: Vec<_> = diagnostics.iter().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, Severity::Info);
        assert_eq!(events[0].chain, "cosmoshub");
        assert_eq!(events[0].subject, atom.name);
    }

    #[assay]
    fn unresolvable_reference_skips_asset() {
        let token = asset("utok", "tok", vec![unit("utok", 0)]);
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("chain", &token, ReferenceDenom::Display, &mut diagnostics);

        assert!(records.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.count(Severity::Error), 1);
        let event = diagnostics.iter().next().unwrap();
        assert_eq!(event.chain, "chain");
        assert_eq!(event.subject, "tok token");
    }

    #[assay]
    fn asset_without_units_is_silent() {
        let token = asset("utok", "tok", vec![]);
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("chain", &token, ReferenceDenom::Display, &mut diagnostics);

        assert!(records.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[assay]
    fn duplicate_symbols_keep_the_last_unit() {
        let token = asset(
            "utok",
            "tok",
            vec![unit("utok", 0), unit("TOK", 5), unit("tok", 6)],
        );
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("chain", &token, ReferenceDenom::Display, &mut diagnostics);

        assert_eq!(records.len(), 2);
        let display = by_key(&records, "tok_chain");
        assert_eq!(display.unit, "tok");
        assert_eq!(by_key(&records, "utok_chain").decimals_offset, 6);
    }

    #[assay]
    fn base_reference_mode() {
        let atom = asset("uatom", "atom", vec![unit("uatom", 0), unit("atom", 6)]);
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("cosmoshub", &atom, ReferenceDenom::Base, &mut diagnostics);

        assert_eq!(by_key(&records, "uatom_cosmoshub").decimals_offset, 0);
        assert_eq!(by_key(&records, "atom_cosmoshub").decimals_offset, -6);
    }

    #[assay]
    fn extreme_exponents_do_not_overflow() {
        let token = asset(
            "wide",
            "wide",
            vec![unit("narrow", i32::MIN), unit("wide", i32::MAX)],
        );
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("chain", &token, ReferenceDenom::Display, &mut diagnostics);

        assert_eq!(
            by_key(&records, "narrow_chain").decimals_offset,
            i64::from(i32::MAX) - i64::from(i32::MIN)
        );
        assert_eq!(by_key(&records, "wide_chain").decimals_offset, 0);
    }

    #[assay]
    fn copies_asset_fields() {
        let mut atom = asset("uatom", "atom", vec![unit("uatom", 0), unit("atom", 6)]);
        atom.description = Some("hub token".to_string());
        atom.coingecko_id = Some("cosmos".to_string());
        atom.keywords = Some(vec!["staking".to_string()]);
        let mut diagnostics = Diagnostics::new();

        let records = normalize_asset("cosmoshub", &atom, ReferenceDenom::Display, &mut diagnostics);

        for record in records {
            assert_eq!(record.name, atom.name);
            assert_eq!(record.symbol, "ATOM");
            assert_eq!(record.chain_name, "cosmoshub");
            assert_eq!(record.description.as_deref(), Some("hub token"));
            assert_eq!(record.coingecko_id.as_deref(), Some("cosmos"));
            assert_eq!(record.keywords, Some(vec!["staking".to_string()]));
        }
    }

    #[assay]
    fn serializes_with_registry_field_names() {
        let atom = asset("uatom", "atom", vec![unit("uatom", 0), unit("atom", 6)]);
        let mut diagnostics = Diagnostics::new();
        let records = normalize_asset("cosmoshub", &atom, ReferenceDenom::Display, &mut diagnostics);

        let value = serde_json::to_value(by_key(&records, "uatom_cosmoshub")).unwrap();

        assert_eq!(value["denom"], "uatom");
        assert_eq!(value["decimals"], 6);
        assert_eq!(value["chain"], "cosmoshub");
        assert!(value["logo_URIs"].is_null());
        assert!(value.get("key").is_none());
    }

    #[assay]
    fn parses_reference_denom() {
        assert_eq!("Display".parse::<ReferenceDenom>().unwrap(), ReferenceDenom::Display);
        assert_eq!("base".parse::<ReferenceDenom>().unwrap(), ReferenceDenom::Base);
        assert!("symbol".parse::<ReferenceDenom>().is_err());
    }
}
