//! Version fetchers
//!
//! A fetcher lists the versions available for one kind of source:
//! - Docker: tags from a container registry
//! - GitHub: release tags of a repository
//! - Manual: nothing, manual dependencies are never fetched

mod docker;
mod github;
mod manual;

pub use docker::DockerFetcher;
pub use github::GithubFetcher;
pub use manual::ManualFetcher;

use crate::config::RegistryConfig;
use crate::domain::DependencyType;
use crate::error::{FetchError, RegistryError};
use crate::registry::HttpClient;
use crate::version::{Mask, VersionSet, Versioned};
use async_trait::async_trait;

/// Capability listing versions for a source
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Get the dependency type this fetcher serves
    fn kind(&self) -> DependencyType;

    /// All versions of the source that match the mask, sorted ascending
    async fn all_versions(&self, source: &str, mask: &Mask) -> Result<VersionSet, FetchError>;

    /// The latest version matching the mask
    ///
    /// Fails with `FetchError::EmptyVersionList` when no tag survives.
    async fn latest_version(&self, source: &str, mask: &Mask) -> Result<Versioned, FetchError> {
        self.all_versions(source, mask)
            .await?
            .latest()
            .cloned()
            .ok_or(FetchError::EmptyVersionList)
    }
}

/// The fetcher for each dependency type
pub struct Fetchers {
    docker: Box<dyn Fetcher>,
    github: Box<dyn Fetcher>,
    manual: ManualFetcher,
}

impl Fetchers {
    /// Create a set from explicit docker and github fetchers
    pub fn new(docker: Box<dyn Fetcher>, github: Box<dyn Fetcher>) -> Self {
        Self {
            docker,
            github,
            manual: ManualFetcher,
        }
    }

    /// Create the network-backed fetchers described by the configuration
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let client = HttpClient::with_timeout(config.timeout)?;
        Ok(Self::new(
            Box::new(DockerFetcher::new(client.clone(), config.clone())),
            Box::new(GithubFetcher::new(
                client,
                &config.github_api_url,
                config.github_token.clone(),
            )),
        ))
    }

    /// Select the fetcher for a type; anything not fetchable gets the
    /// manual fetcher, which never reports versions
    pub fn for_type(&self, kind: &DependencyType) -> &dyn Fetcher {
        match kind {
            DependencyType::Docker => self.docker.as_ref(),
            DependencyType::Github => self.github.as_ref(),
            _ => &self.manual,
        }
    }
}
