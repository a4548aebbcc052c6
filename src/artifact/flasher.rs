//! Environment file for the ab-flasher update agent.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::settings::ProvisionConfig;

/// Filename ab-flasher reads at next boot.
pub const ENV_FILE: &str = "ab-flasher.env";

/// Write `ab-flasher.env` at the volume root. Unconditional: every
/// run points the agent at the configured image, with force and
/// verbose fixed on.
pub fn configure(target: &Path, config: &ProvisionConfig) -> Result<()> {
    info!("Configuring ab-flasher");
    let path = target.join(ENV_FILE);
    let contents = format!(
        "AB_OS_IMAGE_URL={}\nAB_FORCE=true\nAB_VERBOSE=1\n",
        config.final_image
    );
    fs::write(&path, contents).with_context(|| format!("writing '{}'", path.display()))
}
