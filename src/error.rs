//! Error types
//!
//! Every failure the provider can report, split into validation-time errors
//! (raised before any request is built) and request-time errors.

use thiserror::Error;

use crate::pve::http::sanitize_for_log;

/// Coarse classification of a [`PveError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingConfiguration,
    InvalidFormat,
    Transport,
    Api,
    Decode,
}

impl ErrorKind {
    /// Whether the error was raised locally, before any network activity
    pub fn is_validation(self) -> bool {
        matches!(self, ErrorKind::MissingConfiguration | ErrorKind::InvalidFormat)
    }
}

#[derive(Error, Debug)]
pub enum PveError {
    #[error("Missing configuration: the provider cannot create the Proxmox API client as there is a missing or empty value for the {0}")]
    MissingConfiguration(&'static str),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-200 response. `body` is kept verbatim; only the display is sanitized.
    #[error("API error: got status {status}: {}", sanitize_for_log(.body))]
    Api { status: u16, body: String },

    #[error("Decode error: unable to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PveError::MissingConfiguration(_) => ErrorKind::MissingConfiguration,
            PveError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            PveError::Transport(_) => ErrorKind::Transport,
            PveError::Api { .. } => ErrorKind::Api,
            PveError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            PveError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PveError {
    fn from(err: reqwest::Error) -> Self {
        PveError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            PveError::MissingConfiguration("Proxmox endpoint").kind(),
            ErrorKind::MissingConfiguration
        );
        assert!(ErrorKind::InvalidFormat.is_validation());
        assert!(!ErrorKind::Api.is_validation());
        assert!(!ErrorKind::Decode.is_validation());
    }

    #[test]
    fn test_api_error_keeps_raw_body() {
        let body = "x".repeat(500);
        let err = PveError::Api {
            status: 500,
            body: body.clone(),
        };

        assert_eq!(err.status(), Some(500));
        let PveError::Api { body: kept, .. } = &err else {
            panic!("expected API error");
        };
        assert_eq!(kept.len(), 500);

        let shown = err.to_string();
        assert!(shown.contains("500"));
        assert!(shown.contains("truncated"));
        assert!(shown.len() < body.len());
    }

    #[test]
    fn test_missing_configuration_names_field() {
        let err = PveError::MissingConfiguration("Proxmox API token ID");
        assert!(err.to_string().contains("Proxmox API token ID"));
    }
}
