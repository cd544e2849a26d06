//! Schema descriptions
//!
//! Static descriptions of the provider configuration block and of the data
//! sources it exposes, in the shape a host engine negotiates.

use serde::Serialize;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int64,
    List,
}

/// How an attribute gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    /// Set by the provider, never by the user
    Computed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub presence: Presence,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    pub description: &'static str,
    /// Attributes of each element, for nested lists
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<Attribute>,
}

impl Attribute {
    const fn new(
        name: &'static str,
        attr_type: AttributeType,
        presence: Presence,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            attr_type,
            presence,
            sensitive: false,
            description,
            nested: Vec::new(),
        }
    }

    pub const fn required_string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::String, Presence::Required, description)
    }

    pub const fn optional_bool(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::Bool, Presence::Optional, description)
    }

    pub const fn computed_string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::String, Presence::Computed, description)
    }

    pub const fn computed_int64(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::Int64, Presence::Computed, description)
    }

    pub fn computed_list(
        name: &'static str,
        description: &'static str,
        nested: Vec<Attribute>,
    ) -> Self {
        Self {
            nested,
            ..Self::new(name, AttributeType::List, Presence::Computed, description)
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Schema of one configuration block or data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Provider configuration block
pub fn provider_schema() -> Schema {
    Schema {
        description: "Interact with Proxmox VE through its JSON API using an API token.",
        attributes: vec![
            Attribute::required_string(
                "endpoint",
                "Proxmox API endpoint URL (e.g., https://proxmox.example.com:8006)",
            ),
            Attribute::required_string(
                "token_id",
                "Proxmox API token ID (e.g., root@pam!mytesttoken)",
            ),
            Attribute::required_string("token_secret", "Proxmox API token secret").sensitive(),
            Attribute::optional_bool("skip_verify", "Skip TLS certificate verification"),
        ],
    }
}

/// `proxmox_storages` data source
pub fn storages_schema() -> Schema {
    Schema {
        description: "Lists all available Proxmox VE storages.",
        attributes: vec![
            Attribute::computed_string("id", "Data source identifier"),
            Attribute::computed_list(
                "storages",
                "List of available storages",
                vec![
                    Attribute::computed_string("storage", "Storage identifier"),
                    Attribute::computed_string("type", "Storage type (e.g., dir, lvm, nfs, etc.)"),
                    Attribute::computed_string("content", "Allowed content types"),
                    Attribute::computed_string("path", "Storage path"),
                    Attribute::computed_int64("priority", "Storage priority"),
                    Attribute::computed_string("digest", "Storage digest"),
                    Attribute::computed_string("prune_backups", "Prune backups configuration"),
                ],
            ),
        ],
    }
}
