//! Read-only Proxmox VE storage data source
//!
//! Validates API token configuration into a [`pve::client::PveClient`], then
//! lists `/api2/json/storage` and projects each entry onto a fixed record of
//! nullable fields.
//!
//! - [`config`] - Layered provider configuration
//! - [`error`] - Error taxonomy
//! - [`provider`] - Provider metadata, schema and data sources
//! - [`pve`] - Proxmox API client
//! - [`output`] - Table/JSON/YAML rendering for the command line

pub mod config;
pub mod error;
pub mod output;
pub mod provider;
pub mod pve;

/// Version injected at compile time via PVE_STORAGES_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("PVE_STORAGES_VERSION") {
    Some(v) => v,
    None => "dev",
};
