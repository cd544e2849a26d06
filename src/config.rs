//! Configuration Management
//!
//! Provider configuration is layered: explicit values (CLI flags or
//! environment variables) win over the JSON config file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable for the API endpoint
pub const ENV_ENDPOINT: &str = "PROXMOX_ENDPOINT";
/// Environment variable for the API token ID
pub const ENV_TOKEN_ID: &str = "PROXMOX_TOKEN_ID";
/// Environment variable for the API token secret
pub const ENV_TOKEN_SECRET: &str = "PROXMOX_TOKEN_SECRET";
/// Environment variable for skipping TLS verification
pub const ENV_SKIP_VERIFY: &str = "PROXMOX_SKIP_VERIFY";

/// Unvalidated provider configuration
///
/// See [`crate::pve::client::PveClient::from_config`] for validation.
#[derive(Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Proxmox API endpoint URL (e.g., https://proxmox.example.com:8006)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Proxmox API token ID (e.g., root@pam!mytesttoken)
    #[serde(default)]
    pub token_id: Option<String>,
    /// Proxmox API token secret
    #[serde(default)]
    pub token_secret: Option<String>,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub skip_verify: Option<bool>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("token_id", &self.token_id)
            .field("token_secret", &self.token_secret.as_ref().map(|_| "[REDACTED]"))
            .field("skip_verify", &self.skip_verify)
            .finish()
    }
}

impl ProviderConfig {
    /// Default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pve-storages").join("config.json"))
    }

    /// Load configuration from disk
    ///
    /// A missing file is an empty configuration; an unreadable or malformed
    /// one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from the default location, if there is one
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Overlay `other` on top of `self`, field by field
    pub fn merge(self, other: ProviderConfig) -> Self {
        Self {
            endpoint: other.endpoint.or(self.endpoint),
            token_id: other.token_id.or(self.token_id),
            token_secret: other.token_secret.or(self.token_secret),
            skip_verify: other.skip_verify.or(self.skip_verify),
        }
    }
}
