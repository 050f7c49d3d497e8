//! Container image fetcher

use super::Fetcher;
use crate::config::RegistryConfig;
use crate::domain::DependencyType;
use crate::error::FetchError;
use crate::registry::{DockerRegistry, HttpClient};
use crate::version::{Mask, VersionSet};
use async_trait::async_trait;

/// Fetches image tags from container registries
pub struct DockerFetcher {
    registry: DockerRegistry,
}

impl DockerFetcher {
    /// Create a new docker fetcher
    pub fn new(client: HttpClient, config: RegistryConfig) -> Self {
        Self {
            registry: DockerRegistry::new(client, config),
        }
    }
}

#[async_trait]
impl Fetcher for DockerFetcher {
    fn kind(&self) -> DependencyType {
        DependencyType::Docker
    }

    async fn all_versions(&self, source: &str, mask: &Mask) -> Result<VersionSet, FetchError> {
        let tags = self.registry.tags(source).await?;
        Ok(tags.into_iter().collect::<VersionSet>().filter(mask))
    }
}
