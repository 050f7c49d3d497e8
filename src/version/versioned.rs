//! Version tags and version sets
//!
//! A `Versioned` is an opaque tag exactly as the source reported it. A
//! `VersionSet` is the unordered bag of tags returned by one fetch; it is
//! consumed right away to produce a filtered set or a single latest tag.

use super::compare::compare;
use super::mask::Mask;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single version tag (e.g. `v1.10.0-rc.1`, `3.8`, `latest`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Versioned(String);

impl Versioned {
    /// Create a new version tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Get the raw tag
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw tag
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Loose ordering against another tag
    ///
    /// Distinct tags may compare equal, e.g. `v2.0.0` and `2.0.0`.
    pub fn cmp_loose(&self, other: &Self) -> Ordering {
        compare(&self.0, &other.0)
    }
}

impl fmt::Display for Versioned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Versioned {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Versioned {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// An unordered collection of version tags for one dependency
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSet {
    versions: Vec<Versioned>,
}

impl VersionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tags, duplicates included
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the set holds no tags
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Iterate over the tags in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Versioned> {
        self.versions.iter()
    }

    /// Return a copy of the set sorted ascending under the loose ordering
    ///
    /// The sort is stable, so tags that compare equal keep their
    /// relative input order.
    pub fn sorted(&self) -> VersionSet {
        let mut versions = self.versions.clone();
        versions.sort_by(Versioned::cmp_loose);
        Self { versions }
    }

    /// The maximum tag, or None for an empty set
    pub fn latest(&self) -> Option<&Versioned> {
        self.versions.iter().max_by(|a, b| a.cmp_loose(b))
    }

    /// The last tag in the current order
    pub fn last(&self) -> Option<&Versioned> {
        self.versions.last()
    }

    /// Keep only the tags fully matched by the mask, sorted ascending
    pub fn filter(&self, mask: &Mask) -> VersionSet {
        let versions = self
            .versions
            .iter()
            .filter(|v| mask.matches(v.as_str()))
            .cloned()
            .collect();
        Self { versions }.sorted()
    }
}

impl<T: Into<Versioned>> FromIterator<T> for VersionSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            versions: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for VersionSet {
    type Item = Versioned;
    type IntoIter = std::vec::IntoIter<Versioned>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.into_iter()
    }
}
