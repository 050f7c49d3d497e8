//! Fetcher for manually tracked dependencies

use super::Fetcher;
use crate::domain::DependencyType;
use crate::error::FetchError;
use crate::version::{Mask, VersionSet};
use async_trait::async_trait;

/// Never contacts anything; manual dependencies have no remote versions
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualFetcher;

#[async_trait]
impl Fetcher for ManualFetcher {
    fn kind(&self) -> DependencyType {
        DependencyType::Manual
    }

    async fn all_versions(&self, _source: &str, _mask: &Mask) -> Result<VersionSet, FetchError> {
        Ok(VersionSet::new())
    }
}
