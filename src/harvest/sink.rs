//! Persistence of the final repository set.
//!
//! The set is written once, after the harvest loop finishes. A JSON array of
//! strings keeps the artifact readable by anything expecting a flat list.

use crate::harvest::accumulator::RepoUrlSet;
use crate::model::CanonicalRepoUrl;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to (de)serialize repository list: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[async_trait]
pub trait RepoSink: Send + Sync {
    async fn save(&self, urls: &RepoUrlSet) -> Result<(), SinkError>;
}

/// Writes the set as a sorted, pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads back a file written by [`RepoSink::save`].
    pub async fn load(path: &Path) -> Result<RepoUrlSet, SinkError> {
        let contents = tokio::fs::read(path).await.map_err(|source| SinkError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let urls: Vec<CanonicalRepoUrl> = serde_json::from_slice(&contents)?;
        Ok(urls.into_iter().collect())
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl RepoSink for JsonFileSink {
    async fn save(&self, urls: &RepoUrlSet) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let list: Vec<&str> = urls.iter().map(|u| u.as_str()).collect();
        let contents = serde_json::to_vec_pretty(&list)?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| self.io_error(e))?;

        info!(path = %self.path.display(), count = urls.len(), "Repository set saved");
        Ok(())
    }
}
