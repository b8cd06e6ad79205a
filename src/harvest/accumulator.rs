//! Deduplicating set of canonical repository URLs.

use crate::model::CanonicalRepoUrl;
use std::collections::BTreeSet;

/// Grows monotonically during a harvest; there is no removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoUrlSet {
    urls: BTreeSet<CanonicalRepoUrl>,
}

impl RepoUrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the URL was not already present.
    pub fn insert(&mut self, url: CanonicalRepoUrl) -> bool {
        self.urls.insert(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalRepoUrl> {
        self.urls.iter()
    }

    pub fn into_sorted_vec(self) -> Vec<String> {
        self.urls
            .into_iter()
            .map(CanonicalRepoUrl::into_string)
            .collect()
    }
}

impl FromIterator<CanonicalRepoUrl> for RepoUrlSet {
    fn from_iter<I: IntoIterator<Item = CanonicalRepoUrl>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::normalize::normalize;

    #[test]
    fn test_insert_reports_novelty() {
        let mut set = RepoUrlSet::new();
        assert!(set.is_empty());
        assert!(set.insert(normalize("https://github.com/a/b")));
        assert!(!set.insert(normalize("git+https://github.com/a/b.git")));
        assert!(set.insert(normalize("https://github.com/a/c")));
        assert_eq!(set.len(), 2);
        assert!(set.contains("https://github.com/a/b"));
        assert!(!set.contains("https://github.com/a/d"));
    }

    #[test]
    fn test_exact_string_equality() {
        let mut set = RepoUrlSet::new();
        set.insert(normalize("https://github.com/a/b"));
        set.insert(normalize("https://github.com/A/b"));
        set.insert(normalize("https://github.com/a/b/"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_into_sorted_vec() {
        let set: RepoUrlSet = ["https://github.com/z/z", "https://github.com/a/a"]
            .into_iter()
            .map(normalize)
            .collect();
        assert_eq!(
            set.into_sorted_vec(),
            vec!["https://github.com/a/a", "https://github.com/z/z"]
        );
    }
}
