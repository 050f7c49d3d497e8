//! Reconcile cycle coordinating store, fetchers and notifier
//!
//! This module provides:
//! - Workflow coordination: seed → read → refresh → diff → notify → write
//! - The notifier only hears about runs with new or updated dependencies
//! - Progress display while refreshing
//! - Abort on infrastructure failures; per-dependency failures stay notes

use crate::domain::{Manifest, Spec};
use crate::error::AppError;
use crate::fetcher::Fetchers;
use crate::notifier::Notifier;
use crate::progress::Progress;
use crate::reconcile::Differences;
use crate::store::ReadWriter;
use tracing::{debug, info};

/// Orchestrator for one reconcile run against a store
pub struct Orchestrator<'a> {
    /// Where the ground truth lives
    store: Box<dyn ReadWriter>,
    /// Who hears about new and updated dependencies
    notifier: Box<dyn Notifier + 'a>,
    /// Version sources per dependency type
    fetchers: Fetchers,
    /// Schema version for a freshly created store
    api_version: String,
    /// Whether to draw a progress bar
    show_progress: bool,
}

/// Result of a reconcile run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// The manifest written back to the store
    pub manifest: Manifest,
    /// Number of dependencies the store did not know about
    pub new: usize,
    /// Number of dependencies with a newer resolved version
    pub updated: usize,
    /// Number of dependencies without relevant change
    pub existing: usize,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator
    pub fn new(
        store: Box<dyn ReadWriter>,
        notifier: Box<dyn Notifier + 'a>,
        fetchers: Fetchers,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            fetchers,
            api_version: api_version.into(),
            show_progress: false,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the reconcile cycle for the incoming dependencies
    ///
    /// The incoming specs only seed the store; identities already stored
    /// keep their stored state. Seeds the store did not hold before the
    /// run are reported as new.
    pub async fn run(&mut self, incoming: &[Spec]) -> Result<SyncResult, AppError> {
        let previous = match self.store.read() {
            Ok(manifest) => manifest,
            Err(e) if e.is_not_found() => Manifest::new(self.api_version.clone()),
            Err(e) => return Err(e.into()),
        };
        debug!(dependencies = previous.len(), "read stored manifest");

        let seeded = self.store.init(&self.api_version, incoming)?;

        let mut progress = Progress::new(self.show_progress);
        let refreshed = seeded
            .latest_with_progress(&self.fetchers, &mut progress)
            .await;

        let differences = Differences::between(&previous, &refreshed);
        debug!(classified = differences.total(), "diffed against stored manifest");
        if differences.has_changes() {
            self.notifier.send(&differences.new, &differences.updated)?;
        } else {
            debug!("nothing new to report");
        }

        let (new, updated, existing) = (
            differences.new.len(),
            differences.updated.len(),
            differences.existing.len(),
        );
        let api_version = if seeded.api_version.is_empty() {
            self.api_version.clone()
        } else {
            seeded.api_version.clone()
        };
        let manifest = differences.into_manifest(api_version);
        self.store.write(&manifest)?;

        info!(new, updated, existing, "reconciled dependencies");
        Ok(SyncResult {
            manifest,
            new,
            updated,
            existing,
        })
    }
}
