//! Proxmox API token authentication
//!
//! Proxmox VE authenticates API tokens with a single header of the form
//! `PVEAPIToken=<user>@<realm>!<token-name>=<secret>`. No login session or
//! ticket is involved.

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::error::PveError;

/// Separator between the user@realm part and the token name of a token ID
pub const TOKEN_ID_SEPARATOR: char = '!';

/// Header scheme used by Proxmox for API tokens
const TOKEN_SCHEME: &str = "PVEAPIToken";

/// API token credential pair
///
/// The `Authorization` value is built once, so a token that cannot be sent
/// is rejected at construction rather than on first use.
#[derive(Clone)]
pub struct ApiToken {
    id: String,
    authorization: HeaderValue,
}

impl ApiToken {
    pub fn new(id: &str, secret: SecretString) -> Result<Self, PveError> {
        let raw = format!("{}={}={}", TOKEN_SCHEME, id, secret.expose_secret());
        let mut authorization = HeaderValue::from_str(&raw).map_err(|_| {
            PveError::InvalidFormat(
                "The API token ID or secret contains characters not allowed in an HTTP header.".to_string(),
            )
        })?;
        authorization.set_sensitive(true);

        Ok(Self {
            id: id.to_string(),
            authorization,
        })
    }

    /// Token ID, e.g. `root@pam!terraform`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value for the `Authorization` header, marked sensitive
    pub(crate) fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Check that a token ID follows `user@realm!tokenname`
pub fn is_valid_token_id(token_id: &str) -> bool {
    token_id.contains(TOKEN_ID_SEPARATOR)
}
