//! SSH trust material for first boot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::settings::ProvisionConfig;

/// Authorize the configured public key for SSH login.
///
/// Skipped entirely when no key is set; the `ssh/` directory only
/// exists when there is something to put in it. The reserved
/// `ssh_ca_key` setting is accepted upstream but deliberately never
/// written here.
pub fn configure(target: &Path, config: &ProvisionConfig) -> Result<()> {
    let Some(key) = config.ssh_key.as_deref().filter(|key| !key.is_empty()) else {
        return Ok(());
    };

    info!("Configuring ssh");
    let ssh_dir = super::ensure_dir(target, "ssh")?;
    let path = ssh_dir.join("authorized_keys");
    fs::write(&path, format!("{key}\n")).with_context(|| format!("writing '{}'", path.display()))
}
