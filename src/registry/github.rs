//! GitHub Releases API client
//!
//! Lists release tags for a repository.
//! API endpoint: https://api.github.com/repos/{owner}/{repo}/releases

use super::client::{Credentials, HttpClient, Page};
use crate::error::RegistryError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Releases requested per page (the API maximum)
const PER_PAGE: u32 = 100;

/// URL prefixes accepted for GitHub sources
const SOURCE_PREFIXES: &[&str] = &["https://github.com/", "http://github.com/", "github.com/"];

/// Response entry from the releases endpoint
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    draft: bool,
}

/// Repository coordinates parsed from a GitHub URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
}

impl GithubRepo {
    /// Parse `https://github.com/<owner>/<repo>` or `github.com/<owner>/<repo>`,
    /// tolerating a `.git` suffix and trailing path segments
    pub fn from_url(source: &str) -> Option<Self> {
        let path = SOURCE_PREFIXES
            .iter()
            .find_map(|prefix| source.trim().strip_prefix(prefix))?;

        let mut segments = path.split('/');
        let owner = segments.next()?.trim();
        let repo = segments.next()?.trim();
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        if owner.is_empty() || repo.is_empty() {
            return None;
        }

        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for GithubRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Client for the GitHub releases endpoint
pub struct GithubReleases {
    client: HttpClient,
    base_url: String,
    credentials: Credentials,
}

impl GithubReleases {
    /// Create a new client against the given API base URL
    pub fn new(client: HttpClient, base_url: &str, token: Option<String>) -> Self {
        let credentials = match token {
            Some(token) => Credentials::Bearer(token),
            None => Credentials::Anonymous,
        };
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// List the tag names of all published releases, following pagination
    pub async fn tags(&self, repo: &GithubRepo) -> Result<Vec<String>, RegistryError> {
        let name = repo.to_string();
        let mut tags = Vec::new();
        let mut url = Some(format!(
            "{}/repos/{}/{}/releases?per_page={}",
            self.base_url, repo.owner, repo.repo, PER_PAGE
        ));

        let mut visited = HashSet::new();

        while let Some(current) = url {
            if !visited.insert(current.clone()) {
                warn!(repo = %name, url = %current, "releases pagination revisits a page, stopping");
                break;
            }
            let page: Page<Vec<Release>> = self
                .client
                .get_page(&current, &self.credentials, &name, "GitHub")
                .await?;
            tags.extend(
                page.body
                    .into_iter()
                    .filter(|r| !r.draft)
                    .map(|r| r.tag_name),
            );
            url = page.next;
        }

        debug!(repo = %name, count = tags.len(), "listed releases");
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn releases(server: &Server, token: Option<&str>) -> GithubReleases {
        GithubReleases::new(
            HttpClient::new().unwrap(),
            &server.url(),
            token.map(str::to_string),
        )
    }

    fn repo(owner: &str, name: &str) -> GithubRepo {
        GithubRepo {
            owner: owner.to_string(),
            repo: name.to_string(),
        }
    }

    #[test]
    fn test_repo_from_url() {
        assert_eq!(
            GithubRepo::from_url("https://github.com/kubernetes/kubernetes"),
            Some(repo("kubernetes", "kubernetes"))
        );
        assert_eq!(
            GithubRepo::from_url("github.com/helm/helm.git"),
            Some(repo("helm", "helm"))
        );
        assert_eq!(
            GithubRepo::from_url("https://github.com/coreos/etcd/releases"),
            Some(repo("coreos", "etcd"))
        );
    }

    #[test]
    fn test_repo_from_invalid_url() {
        assert_eq!(GithubRepo::from_url("https://github.com/kubernetes"), None);
        assert_eq!(GithubRepo::from_url("https://github.com/"), None);
        assert_eq!(GithubRepo::from_url("https://gitlab.com/foo/bar"), None);
        assert_eq!(GithubRepo::from_url("alpine"), None);
    }

    #[tokio::test]
    async fn test_tags_skip_drafts_and_follow_pages() {
        let mut server = Server::new_async().await;
        let next = format!("{}/repositories/1/releases?per_page=100&page=2", server.url());
        let first = server
            .mock("GET", "/repos/kubernetes/kubernetes/releases")
            .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
            .match_header("authorization", "Bearer gh-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("link", format!(r#"<{}>; rel="next""#, next).as_str())
            .with_body(
                r#"[
                    {"tag_name": "v1.10.0", "draft": false},
                    {"tag_name": "v1.11.0-rc.1", "draft": true}
                ]"#,
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", "/repositories/1/releases")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"tag_name": "v1.9.6"}]"#)
            .create_async()
            .await;

        let tags = releases(&server, Some("gh-token"))
            .tags(&repo("kubernetes", "kubernetes"))
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(tags, vec!["v1.10.0", "v1.9.6"]);
    }

    #[tokio::test]
    async fn test_tags_pagination_cycle_stops() {
        let mut server = Server::new_async().await;
        let back = format!("{}/repos/o/r/releases?per_page=100", server.url());
        let next = format!("{}/page2", server.url());
        let first = server
            .mock("GET", "/repos/o/r/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("link", format!(r#"<{}>; rel="next""#, next).as_str())
            .with_body(r#"[{"tag_name": "v1.0.0"}]"#)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/page2")
            .with_status(200)
            .with_header("link", format!(r#"<{}>; rel="next""#, back).as_str())
            .with_body(r#"[{"tag_name": "v0.9.0"}]"#)
            .expect(1)
            .create_async()
            .await;

        let tags = releases(&server, None)
            .tags(&repo("o", "r"))
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(tags, vec!["v1.0.0", "v0.9.0"]);
    }

    #[tokio::test]
    async fn test_tags_forbidden_without_rate_limit_is_authentication() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/private/repo/releases")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let err = releases(&server, None)
            .tags(&repo("private", "repo"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_tags_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/nonexistent/repo/releases")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = releases(&server, None)
            .tags(&repo("nonexistent", "repo"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_tags_rate_limited() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/some/repo/releases")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("x-ratelimit-remaining", "0")
            .create_async()
            .await;

        let err = releases(&server, None)
            .tags(&repo("some", "repo"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_tags_empty_repository() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/some/empty/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let tags = releases(&server, None)
            .tags(&repo("some", "empty"))
            .await
            .unwrap();
        assert!(tags.is_empty());
    }
}
