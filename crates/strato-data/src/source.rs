//! # Data Sources
//!
//! Where the JSON datasets come from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       DataSource (async trait)                          │
//! │                                                                         │
//! │   fetch(Resource) ──► raw bytes of one dataset file                     │
//! │                                                                         │
//! │   ┌───────────────────────────┐     ┌───────────────────────────────┐  │
//! │   │ HttpSource                │     │ DirSource                     │  │
//! │   │ GET {base}/services.json  │     │ read {root}/services.json     │  │
//! │   │ non-2xx ──► Status error  │     │ missing ──► Io error          │  │
//! │   └───────────────────────────┘     └───────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{LoadError, LoadResult};

/// The static datasets the catalog is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Services,
    PriceRules,
    Users,
    Orders,
}

impl Resource {
    /// File name of the dataset, relative to the data root.
    pub fn file_name(&self) -> &'static str {
        match self {
            Resource::Services => "services.json",
            Resource::PriceRules => "pricerules.json",
            Resource::Users => "user.json",
            Resource::Orders => "orders.json",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Fetches raw dataset payloads.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, resource: Resource) -> LoadResult<Vec<u8>>;

    /// Where the data comes from, for log lines.
    fn describe(&self) -> String;
}

// =============================================================================
// HTTP
// =============================================================================

/// Datasets served as static files under a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    /// Creates a source rooted at `base_url` (e.g. `http://localhost:5173/data`).
    pub fn new(base_url: &str) -> LoadResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> LoadResult<Self> {
        let mut base = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(HttpSource { client, base })
    }

    pub fn url_for(&self, resource: Resource) -> LoadResult<Url> {
        Ok(self.base.join(resource.file_name())?)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, resource: Resource) -> LoadResult<Vec<u8>> {
        let url = self.url_for(resource)?;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| LoadError::Transport { resource, source })?;

        let status = response.status();
        debug!(%resource, status = status.as_u16(), "Dataset response");
        if !status.is_success() {
            return Err(LoadError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| LoadError::Transport { resource, source })?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

// =============================================================================
// Local directory
// =============================================================================

/// Datasets read from a local directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }
}

#[async_trait]
impl DataSource for DirSource {
    async fn fetch(&self, resource: Resource) -> LoadResult<Vec<u8>> {
        let path = self.root.join(resource.file_name());
        debug!("Reading {}", path.display());

        tokio::fs::read(&path)
            .await
            .map_err(|source| LoadError::Io { resource, source })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_url_for_keeps_base_path() {
        let source = HttpSource::new("http://localhost:5173/data").unwrap();
        assert_eq!(
            source.url_for(Resource::PriceRules).unwrap().as_str(),
            "http://localhost:5173/data/pricerules.json"
        );

        let source = HttpSource::new("http://localhost:5173/data/").unwrap();
        assert_eq!(
            source.url_for(Resource::Users).unwrap().as_str(),
            "http://localhost:5173/data/user.json"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpSource::new("::not a url::"),
            Err(LoadError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_http_fetch_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/data/services.json");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .body(r#"{"categories":[]}"#);
            })
            .await;

        let source = HttpSource::new(&server.url("/data")).unwrap();
        let body = source.fetch(Resource::Services).await.unwrap();

        mock.assert_async().await;
        assert_eq!(body, br#"{"categories":[]}"#.to_vec());
    }

    #[tokio::test]
    async fn test_http_fetch_non_success_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pricerules.json");
                then.status(404);
            })
            .await;

        let source = HttpSource::new(&server.base_url()).unwrap();
        let err = source.fetch(Resource::PriceRules).await.unwrap_err();

        assert!(matches!(
            err,
            LoadError::Status {
                resource: Resource::PriceRules,
                status: 404
            }
        ));
    }

    #[tokio::test]
    async fn test_dir_fetch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("user.json"), r#"{"users":[]}"#).unwrap();

        let source = DirSource::new(dir.path());
        let body = source.fetch(Resource::Users).await.unwrap();
        assert_eq!(body, br#"{"users":[]}"#.to_vec());

        let err = source.fetch(Resource::Orders).await.unwrap_err();
        assert!(matches!(err, LoadError::Io { resource: Resource::Orders, .. }));
    }
}
