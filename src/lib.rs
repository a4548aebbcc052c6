//! First-boot provisioning for freshly flashed Raspberry Pi SD cards.
//!
//! After an SD card is flashed with a base image it still needs
//! per-device configuration before first boot: WiFi credentials, an
//! authorized SSH key, and the environment file the ab-flasher update
//! agent reads to fetch the final OS image. This crate runs on the
//! workstation, finds the freshly flashed card among the host's
//! mounted filesystems, and writes those artifacts onto it.
//!
//! - **Mount enumeration** - List mounted filesystem roots via the
//!   host OS (macOS `/Volumes` listing, Linux `/proc/mounts`)
//! - **Target location** - Pick the one mount carrying the
//!   `.configure_me` marker left behind by flashing
//! - **Artifact writing** - Write the conditional first-boot files,
//!   then remove the marker to signal completion
//!
//! # Architecture
//!
//! ```text
//! rpi-provision
//!     │
//!     ├── mounts:   list_mounts() ──► Vec<PathBuf>
//!     ├── target:   find_target() ──► the flashed volume
//!     ├── artifact: write_artifacts() + marker removal
//!     └── settings: ProvisionConfig from RPI_* env vars / .env
//! ```
//!
//! The pipeline is one linear pass per invocation: enumerate, locate,
//! write. No state is kept between runs other than the marker file on
//! the card itself, so an aborted run is always safe to repeat.
//!
//! # Example
//!
//! ```rust,ignore
//! use rpi_provision::ProvisionConfig;
//!
//! let config = ProvisionConfig::load(std::path::Path::new(".env"))?;
//! let volume = rpi_provision::provision(&config)?;
//! println!("configured {}", volume.display());
//! ```

pub mod artifact;
pub mod error;
pub mod mounts;
pub mod settings;
pub mod target;

use std::path::PathBuf;

use anyhow::Result;

pub use error::ProvisionError;
pub use settings::ProvisionConfig;

/// Run the full pipeline against the host's current mount table.
///
/// Returns the mount that was configured. Fails with
/// [`ProvisionError::UnsupportedPlatform`] when mounts cannot be
/// enumerated and [`ProvisionError::TargetNotFound`] when no mounted
/// volume carries the marker.
pub fn provision(config: &ProvisionConfig) -> Result<PathBuf> {
    let mounts = mounts::list_mounts()?;
    provision_mounts(&mounts, config)
}

/// Run locate + write against a pre-enumerated mount list.
pub fn provision_mounts(mounts: &[PathBuf], config: &ProvisionConfig) -> Result<PathBuf> {
    let volume = target::find_target(mounts)?;
    artifact::write_artifacts(&volume, config)?;
    Ok(volume)
}
