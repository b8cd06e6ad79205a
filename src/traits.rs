use crate::harvest::cursor::PaginationCursor;
use crate::model::{PackageDetail, SearchResult};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Registry returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Two-stage registry protocol: paged search, then per-package detail.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetches the page at `cursor`. An empty vector means the registry is exhausted.
    async fn search(
        &self,
        query: &str,
        cursor: &PaginationCursor,
    ) -> Result<Vec<SearchResult>, RegistryError>;

    /// Fetches the full metadata document for one package.
    async fn package(&self, name: &str) -> Result<PackageDetail, RegistryError>;
}
