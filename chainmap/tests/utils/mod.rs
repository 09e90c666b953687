#![allow(dead_code)]

use async_trait::async_trait;
use chainmap::{
    error::SnapshotError,
    registry::snapshot::{Mirror, RevisionSource},
};
use std::{
    fs,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

pub const COSMOSHUB_ASSETS: &str = r#"{
    "$schema": "../assetlist.schema.json",
    "chain_name": "cosmoshub",
    "assets": [
        {
            "description": "The native staking and governance token of the Cosmos Hub.",
            "denom_units": [
                { "denom": "uatom", "exponent": 0 },
                { "denom": "atom", "exponent": 6 }
            ],
            "base": "uatom",
            "name": "Cosmos Hub Atom",
            "display": "atom",
            "symbol": "ATOM",
            "coingecko_id": "cosmos"
        }
    ]
}"#;

pub const OSMOSIS_ASSETS: &str = r#"{
    "chain_name": "osmosis",
    "assets": [
        {
            "denom_units": [
                { "denom": "uosmo", "exponent": 0 },
                { "denom": "osmo", "exponent": 6, "aliases": ["OSMO"] }
            ],
            "base": "uosmo",
            "name": "Osmosis",
            "display": "osmo",
            "symbol": "OSMO"
        },
        {
            "denom_units": [
                { "denom": "uion", "exponent": 0 },
                { "denom": "ion", "exponent": 6, "aliases": ["micro-ion-display"] }
            ],
            "base": "uion",
            "name": "Ion",
            "display": "MICRO-ION-DISPLAY",
            "symbol": "ION"
        },
        {
            "denom_units": [{ "denom": "ubroken", "exponent": 0 }],
            "base": "ubroken",
            "name": "Broken",
            "display": "broken",
            "symbol": "BRK"
        }
    ]
}"#;

pub const OSMOSIS_COSMOSHUB: &str = r#"{
    "$schema": "../ibc_data.schema.json",
    "chain_1": { "chain_name": "cosmoshub", "client_id": "07-tendermint-259", "connection_id": "connection-257" },
    "chain_2": { "chain_name": "osmosis", "client_id": "07-tendermint-1", "connection_id": "connection-1" },
    "channels": [
        {
            "chain_1": { "channel_id": "channel-141", "port_id": "transfer" },
            "chain_2": { "channel_id": "channel-0", "port_id": "transfer" },
            "ordering": "unordered",
            "version": "ics20-1",
            "tags": { "status": "live", "preferred": true, "dex": "osmosis" }
        },
        {
            "chain_1": { "channel_id": "channel-600", "port_id": "icacontroller-cosmos1xyz" },
            "chain_2": { "channel_id": "channel-9000", "port_id": "icahost" },
            "ordering": "ordered",
            "version": "ics27-1",
            "tags": { "status": "killed" }
        }
    ]
}"#;

/// Writes a two chain registry checkout below `root`.
pub fn write_registry(root: &Path) {
    let files = [
        ("cosmoshub/assetlist.json", COSMOSHUB_ASSETS),
        ("osmosis/assetlist.json", OSMOSIS_ASSETS),
        ("_template/assetlist.json", "not json"),
        ("_IBC/cosmoshub-osmosis.json", OSMOSIS_COSMOSHUB),
    ];

    for (path, content) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Always reports the same upstream revision.
pub struct FixedRevision(pub String);

#[async_trait]
impl RevisionSource for FixedRevision {
    async fn latest_revision(&self) -> Result<String, SnapshotError> {
        Ok(self.0.clone())
    }
}

/// Materializes the fixture registry instead of talking to git, counting syncs.
#[derive(Clone, Default)]
pub struct FixtureMirror {
    syncs: Arc<AtomicUsize>,
}

impl FixtureMirror {
    pub fn syncs(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mirror for FixtureMirror {
    async fn sync(&self, destination: &Path) -> Result<(), SnapshotError> {
        self.syncs.fetch_add(1, Ordering::SeqCst);
        write_registry(destination);
        Ok(())
    }
}

/// Writes the fixture registry with an osmosis asset list that lacks `assets`.
pub struct BrokenMirror;

#[async_trait]
impl Mirror for BrokenMirror {
    async fn sync(&self, destination: &Path) -> Result<(), SnapshotError> {
        write_registry(destination);
        fs::write(
            destination.join("osmosis/assetlist.json"),
            r#"{ "chain_name": "osmosis" }"#,
        )
        .unwrap();
        Ok(())
    }
}

/// Fails every sync the way a failed `git pull` does.
pub struct FailingMirror;

#[async_trait]
impl Mirror for FailingMirror {
    async fn sync(&self, _destination: &Path) -> Result<(), SnapshotError> {
        Err(SnapshotError::Git {
            command: "pull".to_string(),
            message: "could not resolve host".to_string(),
        })
    }
}
