//! Configuration commands. These never touch the backend.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use mostrador_client::ClientConfig;
use std::path::PathBuf;

use crate::output::{opt, Output};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + environment)
    Show,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCommand, path: Option<PathBuf>, out: &Output) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = ClientConfig::load(path).context("loading configuration")?;
            out.emit(&config, || {
                println!("api_url       {}", config.api_url);
                println!("timeout_secs  {}", config.timeout_secs);
                println!("database      {}", config.database_path().display());
                println!("band_rule     {}", config.band_rule);
                println!(
                    "config file   {}",
                    opt(ClientConfig::default_config_path().map(|p| p.display().to_string()))
                );
            })
        }
        ConfigCommand::Init { force } => {
            let path = path
                .or_else(ClientConfig::default_config_path)
                .context("no configuration directory on this platform; pass --config")?;
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ClientConfig::default().save(Some(path.clone()))?;
            out.emit(&path, || println!("Configuración guardada en {}", path.display()))
        }
    }
}
