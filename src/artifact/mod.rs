//! Artifacts written to the target volume for consumption at next boot.
//!
//! Each artifact is write-only from this side: firmware and the update
//! agent read them on the Pi, nothing here ever reads one back. All
//! writes are whole-file overwrites, so repeating a run after a
//! failure is always safe.

pub mod flasher;
pub mod ssh;
pub mod wifi;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::settings::ProvisionConfig;
use crate::target::MARKER_FILE;

/// Write every applicable artifact to `target`, then remove the
/// marker.
///
/// Steps run in a fixed order and the first failure aborts the rest;
/// already-written artifacts are left in place since the surviving
/// marker makes the next run rewrite them. Marker removal comes last
/// and is the single signal of overall success: if it fails, the run
/// failed even though the artifacts landed.
pub fn write_artifacts(target: &Path, config: &ProvisionConfig) -> Result<()> {
    ssh::configure(target, config)?;
    wifi::configure(target, config)?;
    flasher::configure(target, config)?;
    remove_marker(target)?;
    info!("Configuration completed");
    Ok(())
}

fn remove_marker(target: &Path) -> Result<()> {
    let marker = target.join(MARKER_FILE);
    fs::remove_file(&marker).with_context(|| format!("removing marker '{}'", marker.display()))
}

/// Create `{target}/{name}` if needed and return it.
pub(crate) fn ensure_dir(target: &Path, name: &str) -> Result<PathBuf> {
    let dir = target.join(name);
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating directory '{}'", dir.display()))?;
    Ok(dir)
}
