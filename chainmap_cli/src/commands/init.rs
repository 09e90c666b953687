use crate::{config, prelude::*};
use abscissa_core::{Command, Runnable};
use clap::Parser;
use std::path::PathBuf;

/// `init` subcommand
///
/// Writes a config file with every setting at its default value. Without a path the file
/// goes to `~/.chainmap/config.toml`.
#[derive(Command, Debug, Parser)]
pub struct InitCmd {
    /// Where to write the config file
    pub path: Option<PathBuf>,

    /// Replace an existing file
    #[clap(short, long)]
    pub overwrite: bool,
}

impl Runnable for InitCmd {
    fn run(&self) {
        let path = self
            .path
            .clone()
            .or_else(config::default_config_path)
            .unwrap_or_else(|| {
                status_err!("can't determine home directory, pass a path explicitly");
                std::process::exit(1);
            });

        match config::init(&path, self.overwrite) {
            Ok(true) => status_ok!("Created", "{}", path.display()),
            Ok(false) => status_warn!(
                "{} already exists, pass --overwrite to replace it",
                path.display()
            ),
            Err(err) => {
                status_err!("can't write config file: {}", err);
                std::process::exit(1);
            }
        }
    }
}
