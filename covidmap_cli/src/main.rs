mod cli;
mod display;
mod error;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, RunCommand};
use covidmap::config::Config;
use log::debug;

use crate::error::CovidMapCliResult;

const DEFAULT_LOGGING_LEVEL: &str = "warn";

#[tokio::main]
async fn main() -> Result<()> {
    // Set RUST_LOG to `DEFAULT_LOGGING_LEVEL` if not set
    let _ =
        std::env::var("RUST_LOG").map_err(|_| std::env::set_var("RUST_LOG", DEFAULT_LOGGING_LEVEL));
    pretty_env_logger::init_timed();
    let args = Cli::parse();
    debug!("args: {args:?}");
    let config = match dirs::config_dir() {
        // Linux: ~/.config/covidmap/config.toml
        // macOS: ~/Library/Application Support/covidmap/config.toml
        Some(dir) => read_config_from_toml(dir.join("covidmap").join("config.toml"))?,
        None => Config::default(),
    };
    debug!("config: {config:?}");

    args.into_command().run(config).await?;
    Ok(())
}

fn read_config_from_toml<P: AsRef<Path>>(file_path: P) -> CovidMapCliResult<Config> {
    match std::fs::read_to_string(file_path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}
