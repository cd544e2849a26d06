//! Proxmox VE API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - API token credentials and the `PVEAPIToken` header
//! - [`client`] - Validated client descriptor used by every request
//! - [`field`] - Nullable, leniently typed API fields
//! - [`http`] - HTTP utilities for REST API calls
//! - [`storages`] - Storage listing and projection

pub mod auth;
pub mod client;
pub mod field;
pub mod http;
pub mod storages;
