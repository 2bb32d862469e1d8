//! # Load Error Types
//!
//! Error types for fetching and decoding the catalog datasets.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / io::Error / serde_json::Error                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LoadError (this module) ← Adds the resource that failed               │
//! │       │                                                                 │
//! │       ├──► CatalogStore::record_failure(msg) ← message kept on store    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in strato-cli) ← LOAD_FAILED code for the session           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::source::Resource;

/// Catalog loading errors.
///
/// A fetch either yields a complete, well-formed payload or one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The request never produced a response.
    ///
    /// ## When This Occurs
    /// - Connection refused / DNS failure
    /// - TLS handshake failure
    /// - Body read interrupted
    #[error("Request for {resource} failed: {source}")]
    Transport {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status} ({resource})")]
    Status { resource: Resource, status: u16 },

    /// Reading a local dataset file failed.
    #[error("Cannot read {resource}: {source}")]
    Io {
        resource: Resource,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not the expected JSON shape.
    #[error("Malformed {resource}: {source}")]
    Parse {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL cannot be used.
    #[error("Invalid data URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl LoadError {
    /// The dataset this error belongs to, when known.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            LoadError::Transport { resource, .. }
            | LoadError::Status { resource, .. }
            | LoadError::Io { resource, .. }
            | LoadError::Parse { resource, .. } => Some(*resource),
            LoadError::InvalidUrl(_) => None,
        }
    }
}

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = LoadError::Status {
            resource: Resource::PriceRules,
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP error! status: 404 (pricerules.json)");
        assert_eq!(err.resource(), Some(Resource::PriceRules));
    }

    #[test]
    fn test_parse_message_names_resource() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LoadError::Parse {
            resource: Resource::Services,
            source,
        };
        assert!(err.to_string().starts_with("Malformed services.json"));
    }

    #[test]
    fn test_invalid_url_has_no_resource() {
        let err = LoadError::from(url::Url::parse("not a url").unwrap_err());
        assert!(err.resource().is_none());
    }
}
