//! Locating the flashed volume by its configuration marker.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::error::ProvisionError;

/// Zero-byte sentinel left at the root of a volume by flashing.
///
/// Present means "flashed, not yet configured". The artifact writer
/// removes it as the final step of a successful run, so its absence
/// means "configured". Content is ignored; only read-openability
/// counts.
pub const MARKER_FILE: &str = ".configure_me";

/// Scan `mounts` in order and return the first whose marker file opens
/// for reading.
///
/// A candidate that errors on the open (no marker, permissions, I/O)
/// is skipped rather than failing the scan; system mounts that refuse
/// reads are expected in the list. The scan short-circuits on the
/// first hit and fails only after every mount has been tried.
pub fn find_target(mounts: &[PathBuf]) -> Result<PathBuf> {
    for mount in mounts {
        let marker = mount.join(MARKER_FILE);
        match File::open(&marker) {
            Ok(_) => return Ok(mount.clone()),
            Err(e) => debug!("skipping '{}': {}", mount.display(), e),
        }
    }
    Err(ProvisionError::TargetNotFound.into())
}
