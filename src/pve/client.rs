//! Proxmox Client
//!
//! Validated, immutable client descriptor combining the endpoint, API token
//! and HTTP transport. Built once per provider configuration and passed to
//! every read.

use super::auth::{self, ApiToken, TOKEN_ID_SEPARATOR};
use super::http::PveHttpClient;
use crate::config::ProviderConfig;
use crate::error::PveError;
use secrecy::SecretString;
use url::Url;

/// Path prefix shared by every JSON API call
pub const API_PREFIX: &str = "/api2/json";

const ENDPOINT_EXAMPLE: &str = "https://proxmox.example.com:8006";

/// Main Proxmox client
#[derive(Clone, Debug)]
pub struct PveClient {
    endpoint: String,
    token: ApiToken,
    http: PveHttpClient,
}

impl PveClient {
    /// Validate provider configuration and build a client
    ///
    /// Pure validation plus construction: no request is sent.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, PveError> {
        let endpoint = required(config.endpoint.as_deref(), "Proxmox endpoint")?;
        let token_id = required(config.token_id.as_deref(), "Proxmox API token ID")?;
        let token_secret = required(config.token_secret.as_deref(), "Proxmox API token secret")?;

        if !auth::is_valid_token_id(token_id) {
            return Err(PveError::InvalidFormat(format!(
                "The API token ID should contain a '{}' character and follow the format 'user@realm!tokenname' (e.g., 'root@pam!mytesttoken').",
                TOKEN_ID_SEPARATOR
            )));
        }

        let token = ApiToken::new(token_id, SecretString::from(token_secret.to_string()))?;
        let endpoint = normalize_endpoint(endpoint)?;
        let skip_verify = config.skip_verify.unwrap_or(false);
        let http = PveHttpClient::new(skip_verify)?;

        tracing::debug!("Configured Proxmox client for {} as {}", endpoint, token_id);

        Ok(Self {
            endpoint,
            token,
            http,
        })
    }

    /// Base endpoint, never ending in `/`
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn token_id(&self) -> &str {
        self.token.id()
    }

    /// Whether TLS certificate validation is disabled
    pub fn skips_verification(&self) -> bool {
        self.http.skips_verification()
    }

    /// Build a JSON API URL, e.g. `api_url("/storage")`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.endpoint, API_PREFIX, path)
    }

    /// Make a GET request to the Proxmox API
    pub async fn get(&self, path: &str) -> Result<String, PveError> {
        self.http.get(&self.api_url(path), &self.token).await
    }
}

/// Treat missing, empty and whitespace-only values alike
fn required<'a>(value: Option<&'a str>, what: &'static str) -> Result<&'a str, PveError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PveError::MissingConfiguration(what)),
    }
}

/// Trim trailing separators and check the endpoint is an absolute http(s) URL
fn normalize_endpoint(endpoint: &str) -> Result<String, PveError> {
    let trimmed = endpoint.trim().trim_end_matches('/');

    let parsed = Url::parse(trimmed).map_err(|e| {
        PveError::InvalidFormat(format!(
            "The endpoint '{}' is not a valid URL ({}); use an http(s) URL such as {}",
            endpoint, e, ENDPOINT_EXAMPLE
        ))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(PveError::InvalidFormat(format!(
            "The endpoint '{}' must be an http(s) URL such as {}",
            endpoint, ENDPOINT_EXAMPLE
        )));
    }

    Ok(trimmed.to_string())
}
