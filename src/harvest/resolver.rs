//! Per-package detail fetch and repository URL extraction.
//!
//! Every failure on this path is local to one package: the harvest loop only
//! sees a [`Resolution`], never an error.

use crate::harvest::normalize::canonicalize;
use crate::model::CanonicalRepoUrl;
use crate::traits::{RegistryClient, RegistryError};
use std::fmt;
use tracing::debug;

/// Why a package did not yield a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Detail endpoint answered with a non-success status or was unreachable.
    DetailFetchFailed(String),
    /// Detail response could not be decoded.
    MalformedMetadata(String),
    /// Metadata carried no `repository` descriptor.
    NoRepository,
    /// Descriptor is not a git link to the recognized host.
    IneligibleRepository { kind: String, url: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::DetailFetchFailed(reason) => write!(f, "detail fetch failed: {reason}"),
            Rejection::MalformedMetadata(reason) => write!(f, "malformed metadata: {reason}"),
            Rejection::NoRepository => f.write_str("no repository descriptor"),
            Rejection::IneligibleRepository { kind, url } => {
                write!(f, "ineligible repository ({kind}) {url}")
            }
        }
    }
}

impl From<RegistryError> for Rejection {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Decode(reason) => Rejection::MalformedMetadata(reason),
            other => Rejection::DetailFetchFailed(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(CanonicalRepoUrl),
    Skipped(Rejection),
}

pub struct DetailResolver<'a, C: RegistryClient + ?Sized> {
    client: &'a C,
    recognized_host: &'a str,
}

impl<'a, C: RegistryClient + ?Sized> DetailResolver<'a, C> {
    pub fn new(client: &'a C, recognized_host: &'a str) -> Self {
        Self {
            client,
            recognized_host,
        }
    }

    /// Fetches `package_name` and returns its canonical repository URL, if any.
    pub async fn resolve(&self, package_name: &str) -> Resolution {
        let detail = match self.client.package(package_name).await {
            Ok(detail) => detail,
            Err(e) => {
                debug!(package = package_name, error = %e, "Detail fetch failed");
                return Resolution::Skipped(e.into());
            }
        };

        let Some(descriptor) = detail.repository() else {
            return Resolution::Skipped(Rejection::NoRepository);
        };

        match canonicalize(descriptor, self.recognized_host) {
            Ok(url) => Resolution::Resolved(url),
            Err(rejection) => Resolution::Skipped(rejection),
        }
    }
}
