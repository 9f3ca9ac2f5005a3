//! Allow-listed package index URLs
//!
//! Matching is exact string equality. No scheme, case or trailing-slash
//! normalization is applied, so callers must supply the literal form used in the
//! manifests they check.

use std::collections::BTreeSet;

/// Index and source URLs that are acceptable even though a manifest declares them
/// explicitly.
///
/// An empty list is the same as no list at all: every explicitly declared source is
/// then reported (apart from the single source Pipfiles are expected to carry).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    urls: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Whether `url` is listed. An empty list allows nothing.
    pub fn allows(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Whether every URL is listed.
    pub fn allows_all<'a, I>(&self, urls: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        urls.into_iter().all(|url| self.allows(url))
    }

    pub fn extend<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls.extend(urls.into_iter().map(Into::into));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
