use std::path::Path;

use anyhow::{bail, Result};
use env_logger::Env;
use log::{info, warn};
use rpi_provision::settings::{self, DOTENV_FILE};
use rpi_provision::ProvisionConfig;

fn usage() -> &'static str {
    "Usage:\n  rpi-provision\n  rpi-provision --recreate-dotenv"
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let recreate_dotenv = match args.as_slice() {
        [] => false,
        [flag] if flag == "--recreate-dotenv" => true,
        _ => bail!(usage()),
    };

    let dotenv = Path::new(DOTENV_FILE);
    if recreate_dotenv || !dotenv.is_file() {
        warn!("Creating {DOTENV_FILE} file. Fill it in, then re-run.");
        settings::write_dotenv_template(dotenv)?;
        return Ok(());
    }

    let config = ProvisionConfig::load(dotenv)?;
    let volume = rpi_provision::provision(&config)?;
    info!("Configured '{}'", volume.display());
    Ok(())
}
