//! Diffing a stored manifest against a refreshed one
//!
//! Dependencies are matched by identity hash, so list order never matters.
//! The stored snapshot is the ground truth:
//! - New: refreshed identities the store does not hold yet
//! - Updated: identities in both whose resolved latest version differs
//!   from the stored version
//! - Existing: everything else, including identities only in the store

use crate::domain::{Manifest, Spec};

/// Classification of dependencies between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Differences {
    /// Dependencies the store did not know about
    pub new: Vec<Spec>,
    /// Dependencies with a newer resolved version
    pub updated: Vec<Spec>,
    /// Dependencies without relevant change
    pub existing: Vec<Spec>,
}

impl Differences {
    /// Classify every identity of `stored` and `refreshed`
    ///
    /// Refreshed specs are reported for identities present in the refreshed
    /// snapshot; identities only in the store are kept as stored.
    pub fn between(stored: &Manifest, refreshed: &Manifest) -> Self {
        let (_, stored_map) = stored.to_map();
        let (_, refreshed_map) = refreshed.to_map();
        let mut differences = Differences::default();

        for (hash, spec) in &refreshed_map {
            match stored_map.get(hash) {
                None => differences.new.push(spec.clone()),
                Some(previous)
                    if !spec.latest_version.is_empty()
                        && spec.latest_version != previous.version =>
                {
                    differences.updated.push(spec.clone())
                }
                Some(_) => differences.existing.push(spec.clone()),
            }
        }

        for (hash, spec) in &stored_map {
            if !refreshed_map.contains_key(hash) {
                differences.existing.push(spec.clone());
            }
        }

        differences
    }

    /// Number of classified dependencies
    pub fn total(&self) -> usize {
        self.new.len() + self.updated.len() + self.existing.len()
    }

    /// Whether anything is worth reporting
    pub fn has_changes(&self) -> bool {
        !self.new.is_empty() || !self.updated.is_empty()
    }

    /// Merge back into one manifest: new, then updated, then existing
    pub fn into_manifest(self, api_version: impl Into<String>) -> Manifest {
        let mut manifest = Manifest::new(api_version);
        manifest.dependencies.extend(self.new);
        manifest.dependencies.extend(self.updated);
        manifest.dependencies.extend(self.existing);
        manifest
    }
}
