//! Repository descriptor eligibility and URL normalization.
//!
//! Only two rewrites are applied, in order: a leading `git+` is removed, then a
//! trailing `.git`. Case, trailing slashes and query strings are left alone, so
//! `https://github.com/A/b` and `https://github.com/a/b` stay distinct.

use crate::harvest::resolver::Rejection;
use crate::model::{CanonicalRepoUrl, RepositoryDescriptor};

/// Descriptor type accepted for normalization.
pub const GIT_TYPE: &str = "git";

/// Substring identifying the one recognized hosting service.
pub const DEFAULT_RECOGNIZED_HOST: &str = "https://github.com";

const SCHEME_PREFIX: &str = "git+";
const ARCHIVE_SUFFIX: &str = ".git";

/// Returns `true` when the descriptor is a git repository on `host`.
pub fn is_eligible(descriptor: &RepositoryDescriptor, host: &str) -> bool {
    descriptor.kind == GIT_TYPE && descriptor.url.contains(host)
}

/// Strips a leading `git+` and then a trailing `.git`.
pub fn normalize(url: &str) -> CanonicalRepoUrl {
    let url = url.strip_prefix(SCHEME_PREFIX).unwrap_or(url);
    let url = url.strip_suffix(ARCHIVE_SUFFIX).unwrap_or(url);
    CanonicalRepoUrl::new(url.to_string())
}

/// Eligibility test followed by normalization.
pub fn canonicalize(
    descriptor: &RepositoryDescriptor,
    host: &str,
) -> Result<CanonicalRepoUrl, Rejection> {
    if !is_eligible(descriptor, host) {
        return Err(Rejection::IneligibleRepository {
            kind: descriptor.kind.clone(),
            url: descriptor.url.clone(),
        });
    }
    Ok(normalize(&descriptor.url))
}
