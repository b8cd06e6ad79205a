use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// One page of matches returned by the registry search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub package: PackageRef,
}

impl SearchResult {
    pub fn name(&self) -> &str {
        &self.package.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRef {
    pub name: String,
}

/// Full package document from the detail endpoint.
///
/// Every level is optional: a missing branch resolves to `None` through
/// [`PackageDetail::repository`] instead of failing the decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageDetail {
    #[serde(default)]
    pub collected: Option<Collected>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collected {
    #[serde(default)]
    pub metadata: Option<PackageMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub repository: Option<RepositoryDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub url: String,
}

impl PackageDetail {
    pub fn metadata(&self) -> Option<&PackageMetadata> {
        self.collected.as_ref()?.metadata.as_ref()
    }

    pub fn repository(&self) -> Option<&RepositoryDescriptor> {
        self.metadata()?.repository.as_ref()
    }
}

/// Deduplication key for a repository location (e.g. `https://github.com/a/b`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalRepoUrl(String);

impl CanonicalRepoUrl {
    pub(crate) fn new(url: String) -> Self {
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalRepoUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalRepoUrl {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalRepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
