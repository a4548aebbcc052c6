//! Mount enumeration for the host operating system.
//!
//! The card shows up as an ordinary mounted filesystem after flashing,
//! so finding it starts with listing every mount root the OS knows
//! about. Two mechanisms are probed in order, first applicable wins:
//!
//! 1. macOS: one mount per child of `/Volumes`
//! 2. Linux: one mount per line of `/proc/mounts` (field 1)
//!
//! A mechanism whose backing path does not exist is simply absent on
//! this host; any other I/O error is a genuine fault and propagates.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::ProvisionError;

/// macOS mounts removable volumes under this root, named by label.
pub const MACOS_VOLUMES_ROOT: &str = "/Volumes";

/// Linux live mount table: `<device> <mountpoint> <fstype> <opts> ...`
/// per line.
pub const LINUX_MOUNT_TABLE: &str = "/proc/mounts";

/// List the root paths of all currently mounted filesystems.
///
/// Order is whatever the OS reports. Callers must not rely on it for
/// correctness, only for tie-breaking. The list is never cached; every
/// run re-enumerates.
pub fn list_mounts() -> Result<Vec<PathBuf>> {
    list_mounts_from(Path::new(MACOS_VOLUMES_ROOT), Path::new(LINUX_MOUNT_TABLE))
}

/// Probe the given enumeration sources in order.
///
/// Split out from [`list_mounts`] so the probing chain can be pointed
/// at scratch paths in tests.
pub fn list_mounts_from(volumes_root: &Path, mount_table: &Path) -> Result<Vec<PathBuf>> {
    if let Some(mounts) = list_volumes_dir(volumes_root)? {
        return Ok(mounts);
    }
    if let Some(mounts) = read_mount_table(mount_table)? {
        return Ok(mounts);
    }
    Err(ProvisionError::UnsupportedPlatform.into())
}

/// One mount per immediate child of the volumes root, macOS style.
///
/// `Ok(None)` means the root itself does not exist on this host and
/// the next mechanism should be tried.
fn list_volumes_dir(root: &Path) -> Result<Option<Vec<PathBuf>>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("listing volumes under '{}'", root.display()))
        }
    };

    let mut mounts = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("reading an entry of '{}'", root.display()))?;
        mounts.push(entry.path());
    }
    Ok(Some(mounts))
}

/// Parse a `/proc/mounts`-style table; field index 1 of every line is
/// a mount path.
fn read_mount_table(table: &Path) -> Result<Option<Vec<PathBuf>>> {
    let contents = match fs::read_to_string(table) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("reading mount table '{}'", table.display()))
        }
    };

    let mounts = contents
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(PathBuf::from)
        .collect();
    Ok(Some(mounts))
}
