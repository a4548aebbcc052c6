//! WiFi supplicant configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::settings::ProvisionConfig;

/// Write `wifi/wpa_supplicant.conf` when a network name is configured.
///
/// The SSID alone decides whether this runs; a password without an
/// SSID produces nothing, and an SSID without a password renders an
/// empty psk (open networks, or the operator forgot).
pub fn configure(target: &Path, config: &ProvisionConfig) -> Result<()> {
    let Some(ssid) = config.wifi_ssid.as_deref().filter(|ssid| !ssid.is_empty()) else {
        return Ok(());
    };
    let password = config.wifi_password.as_deref().unwrap_or_default();

    info!("Configuring wifi");
    let wifi_dir = super::ensure_dir(target, "wifi")?;
    let path = wifi_dir.join("wpa_supplicant.conf");
    fs::write(&path, supplicant_conf(&config.wifi_country, ssid, password))
        .with_context(|| format!("writing '{}'", path.display()))
}

/// Render the supplicant config the Pi firmware picks up at boot.
///
/// The layout is verbatim what wpa_supplicant expects, single-space
/// indent inside the network block included.
fn supplicant_conf(country: &str, ssid: &str, password: &str) -> String {
    format!(
        "ctrl_interface=DIR=/var/run/wpa_supplicant GROUP=netdev
update_config=1
country={country}

network={{
 ssid=\"{ssid}\"
 psk=\"{password}\"
}}
"
    )
}
