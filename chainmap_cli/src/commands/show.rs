use crate::{error::Error, prelude::*};
use abscissa_core::{Command, Runnable};
use chainmap::{denom_key, export, DenomMap};
use clap::Parser;
use std::{fs, path::PathBuf};

/// `show` subcommand
///
/// Prints one record of an exported denom map. The record is addressed either by its
/// full key (`uatom_cosmoshub`) or by unit and `--chain`.
#[derive(Command, Debug, Parser)]
pub struct ShowCmd {
    /// Map key, or a unit when `--chain` is given
    pub denom: String,

    /// Chain the unit belongs to
    #[clap(long)]
    pub chain: Option<String>,

    /// Exported map to read, defaults to the configured output location
    #[clap(long)]
    pub map: Option<PathBuf>,
}

impl ShowCmd {
    fn key(&self) -> String {
        match &self.chain {
            Some(chain) => denom_key(&self.denom, chain),
            None => self.denom.clone(),
        }
    }

    fn load_map(&self) -> Result<DenomMap, Error> {
        let path = match &self.map {
            Some(path) => path.clone(),
            None => {
                let config = APP.config();
                let output = &config.pipeline.output;
                output.dir.join(format!("{}.json", output.denom_map_name))
            }
        };
        let content = fs::read_to_string(path)?;

        Ok(serde_json::from_str(&content)?)
    }
}

impl Runnable for ShowCmd {
    fn run(&self) {
        let map = self.load_map().unwrap_or_else(|err| {
            status_err!("Can't read denom map: {}, run the denoms command first", err);
            std::process::exit(1);
        });

        let key = self.key();
        match map.get(&key) {
            Some(record) => {
                let output = export::to_json_bytes(record, false).unwrap_or_else(|err| {
                    status_err!("{}", err);
                    std::process::exit(1);
                });
                println!("{}", String::from_utf8_lossy(&output));
            }
            None => {
                status_err!("no denom {} in the map", key);
                std::process::exit(1);
            }
        }
    }
}
