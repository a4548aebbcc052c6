//! Operator-supplied settings for one provisioning run.
//!
//! Every setting is an `RPI_`-prefixed environment variable, with a
//! dotenv-style `.env` file in the working directory as fallback for
//! anything not set in the environment. The binary writes a commented
//! `.env` template on first run so the operator has something to fill
//! in.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::{env, fs};

use anyhow::{bail, Context, Result};

/// Dotenv file consulted for variables absent from the environment.
pub const DOTENV_FILE: &str = ".env";

/// Two-letter regulatory domain used when no country is configured.
const DEFAULT_WIFI_COUNTRY: &str = "NZ";

/// Each settable variable: env name, description for the generated
/// template (empty means no comment block), and the value the template
/// pre-fills.
const VARIABLES: &[(&str, &str, &str)] = &[
    (
        "RPI_FINAL_IMAGE",
        "URL to an OS partition image to be flashed by ab-flasher",
        "<url_to_image>",
    ),
    (
        "RPI_SSH_KEY",
        "If set, RPi will have this SSH public key loaded and SSH enabled.",
        "",
    ),
    (
        "RPI_SSH_CA_KEY",
        "If set, RPi's SSH host key will be signed with this CA key. Not kept.\n\
         You probably shouldn't save this secret here. Maybe pass as an env var instead.\n\
         (not implemented yet)",
        "",
    ),
    ("RPI_WIFI_COUNTRY", "", DEFAULT_WIFI_COUNTRY),
    (
        "RPI_WIFI_SSID",
        "If set, RPi will be configured to use this WiFi after configuration \
         (i.e. to download the final image)",
        "",
    ),
    (
        "RPI_WIFI_PASSWORD",
        "See RPI_WIFI_SSID.\n\
         You probably shouldn't save this secret here. Maybe pass as an env var instead.",
        "",
    ),
];

/// Immutable snapshot of the settings for one run.
///
/// Constructed once, upstream of the pipeline; nothing mutates it
/// afterwards.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// URL (or path) of the OS image ab-flasher should install.
    pub final_image: String,
    /// Public key to authorize for SSH login.
    pub ssh_key: Option<String>,
    /// Reserved for SSH host-key signing. Accepted as input but never
    /// written to the card.
    pub ssh_ca_key: Option<String>,
    /// Two-letter WiFi regulatory domain code.
    pub wifi_country: String,
    /// WiFi network name. Without it no WiFi artifact is produced,
    /// regardless of the password.
    pub wifi_ssid: Option<String>,
    /// WiFi passphrase.
    pub wifi_password: Option<String>,
}

impl ProvisionConfig {
    /// Load settings, environment first, then `dotenv_path`.
    ///
    /// A missing dotenv file just means everything must come from the
    /// environment. Empty values count as unset.
    pub fn load(dotenv_path: &Path) -> Result<Self> {
        let file_vars = read_dotenv(dotenv_path)?;
        Self::from_lookup(|name| env::var(name).ok().or_else(|| file_vars.get(name).cloned()))
    }

    /// Build the record from an arbitrary variable source.
    ///
    /// Split out from [`ProvisionConfig::load`] so tests can supply
    /// variables without touching the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let Some(final_image) = get("RPI_FINAL_IMAGE") else {
            bail!("RPI_FINAL_IMAGE is required; set it in the environment or in '{DOTENV_FILE}'");
        };

        Ok(Self {
            final_image,
            ssh_key: get("RPI_SSH_KEY"),
            ssh_ca_key: get("RPI_SSH_CA_KEY"),
            wifi_country: get("RPI_WIFI_COUNTRY")
                .unwrap_or_else(|| DEFAULT_WIFI_COUNTRY.to_string()),
            wifi_ssid: get("RPI_WIFI_SSID"),
            wifi_password: get("RPI_WIFI_PASSWORD"),
        })
    }
}

/// Read `KEY=VALUE` pairs from a dotenv file.
///
/// `#` comments and blank lines are skipped; a missing file yields an
/// empty map.
fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(e).with_context(|| format!("reading '{}'", path.display())),
    };

    let mut vars = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            vars.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(vars)
}

/// Write the commented `.env` skeleton for the operator to fill in.
///
/// Lists every variable with its description; `RPI_FINAL_IMAGE` gets a
/// placeholder the loader will reject until it is replaced.
pub fn write_dotenv_template(path: &Path) -> Result<()> {
    let mut out = String::from(
        "# Fill these in then run rpi-provision\n\
         # You can also set any of these as environment variables instead.\n\n",
    );
    for (name, description, value) in VARIABLES {
        for line in description.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(name);
        out.push('=');
        out.push_str(value);
        out.push_str("\n\n");
    }
    fs::write(path, out).with_context(|| format!("writing '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_final_image_is_required() {
        let err = ProvisionConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("RPI_FINAL_IMAGE"));
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let vars = [
            ("RPI_FINAL_IMAGE", "http://x/img.gz"),
            ("RPI_SSH_KEY", ""),
            ("RPI_WIFI_SSID", ""),
        ];
        let config = ProvisionConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert!(config.ssh_key.is_none());
        assert!(config.wifi_ssid.is_none());
    }

    #[test]
    fn test_wifi_country_defaults_to_nz() {
        let vars = [("RPI_FINAL_IMAGE", "http://x/img.gz")];
        let config = ProvisionConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.wifi_country, "NZ");
    }

    #[test]
    fn test_all_fields_populate() {
        let vars = [
            ("RPI_FINAL_IMAGE", "http://x/img.gz"),
            ("RPI_SSH_KEY", "ssh-ed25519 AAAA"),
            ("RPI_SSH_CA_KEY", "ca-key"),
            ("RPI_WIFI_COUNTRY", "US"),
            ("RPI_WIFI_SSID", "Home"),
            ("RPI_WIFI_PASSWORD", "secret"),
        ];
        let config = ProvisionConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.final_image, "http://x/img.gz");
        assert_eq!(config.ssh_key.as_deref(), Some("ssh-ed25519 AAAA"));
        assert_eq!(config.ssh_ca_key.as_deref(), Some("ca-key"));
        assert_eq!(config.wifi_country, "US");
        assert_eq!(config.wifi_ssid.as_deref(), Some("Home"));
        assert_eq!(config.wifi_password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_read_dotenv_skips_comments_and_blanks() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(
            &path,
            "# a comment\n\nRPI_FINAL_IMAGE=http://x/img.gz\nRPI_WIFI_SSID=Home\n",
        )
        .unwrap();

        let vars = read_dotenv(&path).unwrap();
        assert_eq!(vars.get("RPI_FINAL_IMAGE").unwrap(), "http://x/img.gz");
        assert_eq!(vars.get("RPI_WIFI_SSID").unwrap(), "Home");
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_read_dotenv_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let vars = read_dotenv(&temp.path().join("absent")).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn test_template_round_trips_through_the_reader() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        write_dotenv_template(&path).unwrap();

        let vars = read_dotenv(&path).unwrap();
        // Every variable appears, with only the placeholder and the
        // country default filled in.
        for (name, _, value) in VARIABLES {
            assert_eq!(vars.get(*name).map(String::as_str), Some(*value));
        }
        assert_eq!(vars.get("RPI_FINAL_IMAGE").unwrap(), "<url_to_image>");
        assert_eq!(vars.get("RPI_WIFI_COUNTRY").unwrap(), "NZ");
    }

    #[test]
    fn test_load_uses_dotenv_fallback() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(&path, "RPI_FINAL_IMAGE=http://fallback/img.gz\n").unwrap();

        // RPI_FINAL_IMAGE is not in the test environment, so the file
        // value wins.
        let config = ProvisionConfig::load(&path).unwrap();
        assert_eq!(config.final_image, "http://fallback/img.gz");
    }
}
