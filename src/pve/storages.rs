//! Proxmox Storages
//!
//! Lists the storage backends configured on a Proxmox VE cluster.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::client::PveClient;
use super::field::{self, Field};
use crate::error::PveError;

/// API path of the storage collection, relative to `/api2/json`
pub const STORAGE_PATH: &str = "/storage";

/// A raw storage entry as decoded from the wire
pub type RawRecord = Map<String, Value>;

/// Storage backend information
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageRecord {
    /// Storage identifier, e.g. `local-lvm`
    #[serde(default)]
    pub storage: Field<String>,
    /// Storage type (dir, lvmthin, nfs, ...)
    #[serde(default, rename = "type")]
    pub storage_type: Field<String>,
    /// Allowed content types, comma separated
    #[serde(default)]
    pub content: Field<String>,
    #[serde(default)]
    pub path: Field<String>,
    #[serde(default, deserialize_with = "field::truncated_integer")]
    pub priority: Field<i64>,
    /// Digest of the storage configuration
    #[serde(default)]
    pub digest: Field<String>,
    /// Backup retention, e.g. `keep-all=1`
    #[serde(default, rename(serialize = "prune_backups", deserialize = "prune-backups"))]
    pub prune_backups: Field<String>,
}

impl StorageRecord {
    /// Project one raw record onto the fixed storage shape
    ///
    /// A `null` entry projects to a record with every field absent.
    pub fn from_raw(raw: Option<RawRecord>) -> Result<Self, PveError> {
        match raw {
            Some(map) => Ok(Self::deserialize(Value::Object(map))?),
            None => Ok(Self::default()),
        }
    }
}

/// Response envelope shared by every Proxmox JSON endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    data: Vec<Option<RawRecord>>,
}

/// Decode a `/storage` response body into storage records
///
/// Output preserves the count and order of the `data` array.
pub fn parse_storages(body: &str) -> Result<Vec<StorageRecord>, PveError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    envelope.data.into_iter().map(StorageRecord::from_raw).collect()
}

/// List all storages visible to the API token
pub async fn list_storages(client: &PveClient) -> Result<Vec<StorageRecord>, PveError> {
    tracing::debug!("Reading Proxmox storages");

    let body = client.get(STORAGE_PATH).await?;
    let storages = parse_storages(&body)?;

    tracing::debug!("Found {} storages", storages.len());
    Ok(storages)
}
