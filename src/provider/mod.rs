//! Provider surface
//!
//! What a host engine sees: provider metadata and schema, the `configure`
//! step that turns user configuration into a [`PveClient`], and the data
//! sources that read through that client.
//!
//! # Example
//!
//! ```no_run
//! use pve_storages::config::ProviderConfig;
//! use pve_storages::provider::{Provider, StoragesDataSource};
//!
//! async fn example(config: ProviderConfig) -> Result<(), pve_storages::error::PveError> {
//!     let provider = Provider::new("dev");
//!     let client = provider.configure(&config)?;
//!     let state = StoragesDataSource::new(client).read().await?;
//!     println!("{} storages", state.storages.len());
//!     Ok(())
//! }
//! ```

pub mod schema;

use serde::Serialize;

use crate::config::ProviderConfig;
use crate::error::PveError;
use crate::pve::client::PveClient;
use crate::pve::storages::{self, StorageRecord};
use schema::Schema;

/// Type name under which the provider registers
pub const PROVIDER_TYPE_NAME: &str = "proxmox";

/// Identifier reported by the storages data source
pub const STORAGES_ID: &str = "storages";

/// Provider name and version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub type_name: &'static str,
    pub version: String,
    pub data_sources: Vec<String>,
}

/// The Proxmox provider
#[derive(Debug, Clone)]
pub struct Provider {
    version: String,
}

impl Provider {
    /// `version` is the release version, "dev" for local builds or "test"
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
        }
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME,
            version: self.version.clone(),
            data_sources: vec![StoragesDataSource::type_name()],
        }
    }

    pub fn schema(&self) -> Schema {
        schema::provider_schema()
    }

    /// Validate configuration and build the client shared by every data source
    pub fn configure(&self, config: &ProviderConfig) -> Result<PveClient, PveError> {
        PveClient::from_config(config)
    }
}

/// State produced by a storages read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoragesState {
    pub id: String,
    pub storages: Vec<StorageRecord>,
}

/// `proxmox_storages` data source
#[derive(Debug, Clone)]
pub struct StoragesDataSource {
    client: PveClient,
}

impl StoragesDataSource {
    pub fn new(client: PveClient) -> Self {
        Self { client }
    }

    pub fn type_name() -> String {
        format!("{}_storages", PROVIDER_TYPE_NAME)
    }

    pub fn schema() -> Schema {
        schema::storages_schema()
    }

    /// Read every storage; no partial state on failure
    pub async fn read(&self) -> Result<StoragesState, PveError> {
        let storages = storages::list_storages(&self.client).await?;
        Ok(StoragesState {
            id: STORAGES_ID.to_string(),
            storages,
        })
    }
}
