//! GitHub release fetcher

use super::Fetcher;
use crate::domain::DependencyType;
use crate::error::FetchError;
use crate::registry::{GithubReleases, GithubRepo, HttpClient};
use crate::version::{Mask, VersionSet};
use async_trait::async_trait;

/// Fetches release tags from GitHub repositories
pub struct GithubFetcher {
    releases: GithubReleases,
}

impl GithubFetcher {
    /// Create a new GitHub fetcher
    pub fn new(client: HttpClient, api_url: &str, token: Option<String>) -> Self {
        Self {
            releases: GithubReleases::new(client, api_url, token),
        }
    }
}

#[async_trait]
impl Fetcher for GithubFetcher {
    fn kind(&self) -> DependencyType {
        DependencyType::Github
    }

    async fn all_versions(&self, source: &str, mask: &Mask) -> Result<VersionSet, FetchError> {
        let repo = GithubRepo::from_url(source).ok_or_else(|| {
            FetchError::invalid_source(source, "expected https://github.com/<owner>/<repo>")
        })?;
        let tags = self.releases.tags(&repo).await?;
        Ok(tags.into_iter().collect::<VersionSet>().filter(mask))
    }
}
