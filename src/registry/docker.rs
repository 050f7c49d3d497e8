//! Container registry tag listing
//!
//! Lists tags through the registry v2 API (`/v2/<repo>/tags/list`).
//! Supported hosts:
//! - Docker Hub, with an anonymous pull token from auth.docker.io
//! - gcr.io, with Basic `_token:<token>` when a token is configured
//! - quay.io, anonymously

use super::client::{Credentials, HttpClient, Page};
use super::image::ImageReference;
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, warn};

const GCR_HOST: &str = "gcr.io";
const QUAY_HOST: &str = "quay.io";

/// Username Google expects alongside an access token
const GCR_TOKEN_USER: &str = "_token";

/// Tags list response
#[derive(Debug, Deserialize)]
struct TagsResponse {
    /// Null for repositories without tags
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Docker Hub token service response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "access_token")]
    token: String,
}

/// Registry endpoints resolved for one image
struct Target {
    base_url: String,
    credentials: Credentials,
    name: &'static str,
}

/// Client listing tags across supported registries
pub struct DockerRegistry {
    client: HttpClient,
    config: RegistryConfig,
}

impl DockerRegistry {
    /// Create a new registry client
    pub fn new(client: HttpClient, config: RegistryConfig) -> Self {
        Self { client, config }
    }

    /// List every tag of an image, following pagination
    pub async fn tags(&self, image: &str) -> Result<Vec<String>, RegistryError> {
        let reference = ImageReference::parse(image)?;
        let target = self.target(&reference).await?;

        let mut tags = Vec::new();
        let mut url = Some(format!(
            "{}/v2/{}/tags/list",
            target.base_url.trim_end_matches('/'),
            reference.repository
        ));

        let mut visited = HashSet::new();

        while let Some(current) = url {
            if !visited.insert(current.clone()) {
                warn!(image = %image, url = %current, "tags pagination revisits a page, stopping");
                break;
            }
            let page: Page<TagsResponse> = self
                .client
                .get_page(&current, &target.credentials, image, target.name)
                .await?;
            tags.extend(page.body.tags.unwrap_or_default());
            url = page.next;
        }

        debug!(image = %image, count = tags.len(), "listed tags");
        Ok(tags)
    }

    /// Pick the base URL and credentials for the image's registry
    async fn target(&self, reference: &ImageReference) -> Result<Target, RegistryError> {
        match reference.registry.as_str() {
            _ if reference.is_docker_hub() => Ok(Target {
                base_url: self.config.docker_hub_url.clone(),
                credentials: self.docker_hub_token(&reference.repository).await?,
                name: "Docker Hub",
            }),
            GCR_HOST => Ok(Target {
                base_url: self.config.gcr_url.clone(),
                credentials: match &self.config.gcr_token {
                    Some(token) => Credentials::Basic {
                        username: GCR_TOKEN_USER.to_string(),
                        password: token.clone(),
                    },
                    None => Credentials::Anonymous,
                },
                name: "gcr.io",
            }),
            QUAY_HOST => Ok(Target {
                base_url: self.config.quay_url.clone(),
                credentials: Credentials::Anonymous,
                name: "quay.io",
            }),
            other => Err(RegistryError::UnsupportedRegistry {
                registry: other.to_string(),
            }),
        }
    }

    /// Request an anonymous pull token for a Docker Hub repository
    async fn docker_hub_token(&self, repository: &str) -> Result<Credentials, RegistryError> {
        let url = format!(
            "{}?service=registry.docker.io&scope=repository:{}:pull",
            self.config.docker_auth_url, repository
        );

        let response: TokenResponse = self
            .client
            .get_json(&url, &Credentials::Anonymous, repository, "Docker Hub auth")
            .await
            .map_err(|e| RegistryError::Authentication {
                registry: "Docker Hub".to_string(),
                message: format!("could not get authorization token: {}", e),
            })?;

        Ok(Credentials::Bearer(response.token))
    }
}
