//! HTTP utilities for Proxmox VE REST API calls

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

use super::auth::ApiToken;
use crate::error::{ErrorKind, PveError};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut cut = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// HTTP client wrapper for Proxmox API calls
#[derive(Clone, Debug)]
pub struct PveHttpClient {
    client: Client,
    skip_verify: bool,
}

impl PveHttpClient {
    /// Create a new HTTP client
    ///
    /// With `skip_verify` the transport accepts any server certificate.
    pub fn new(skip_verify: bool) -> Result<Self, PveError> {
        if skip_verify {
            tracing::warn!("TLS certificate verification is disabled for the Proxmox API client");
        }

        let client = Client::builder()
            .user_agent(concat!("pve-storages/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(skip_verify)
            .build()?;

        Ok(Self {
            client,
            skip_verify,
        })
    }

    /// Whether certificate validation is disabled
    pub fn skips_verification(&self) -> bool {
        self.skip_verify
    }

    /// Make a GET request and return the raw body of a 200 response
    pub async fn get(&self, url: &str, token: &ApiToken) -> Result<String, PveError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .headers(request_headers(token))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(PveError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// Build the per-request headers
fn request_headers(token: &ApiToken) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, token.authorization().clone());
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Format a Proxmox API error for display
/// Security: Never includes the token secret or full response bodies
pub fn format_pve_error(error: &PveError) -> String {
    match error.kind() {
        ErrorKind::MissingConfiguration | ErrorKind::InvalidFormat => return error.to_string(),
        ErrorKind::Transport => {
            return "Unable to reach the Proxmox API. Check the endpoint, your network connection and TLS settings (skip_verify for self-signed certificates).".to_string();
        }
        ErrorKind::Decode => {
            return "The Proxmox API returned a response that could not be parsed.".to_string();
        }
        ErrorKind::Api => {}
    }

    match error.status() {
        Some(401) => "Authentication failed. Check token_id and token_secret.".to_string(),
        Some(403) => "Permission denied. Check the API token privileges on /storage.".to_string(),
        Some(404) => "Endpoint not found. Check that the endpoint points at a Proxmox VE node.".to_string(),
        Some(500) | Some(503) => "Proxmox API temporarily unavailable. Please try again.".to_string(),
        Some(status) => format!("Request failed with status {}.", status),
        None => error.to_string(),
    }
}
