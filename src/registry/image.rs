//! Container image reference parsing

use crate::error::RegistryError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Canonical Docker Hub host
pub const DOCKER_HUB_HOST: &str = "docker.io";

/// Hosts that are aliases of Docker Hub
const DOCKER_HUB_ALIASES: &[&str] = &["docker.io", "index.docker.io", "registry-1.docker.io"];

/// Namespace for official Docker Hub images
const OFFICIAL_NAMESPACE: &str = "library";

/// Lowercase path components separated by `/`
static REPOSITORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:[._-]+[a-z0-9]+)*(?:/[a-z0-9]+(?:[._-]+[a-z0-9]+)*)*$").unwrap()
});

/// Registry host and repository path of an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Registry host, `docker.io` for Docker Hub
    pub registry: String,
    /// Repository path without tag or digest
    pub repository: String,
}

impl ImageReference {
    /// Parse an image reference such as `alpine:3.8`,
    /// `gcr.io/google-containers/pause` or `quay.io/coreos/etcd@sha256:...`
    pub fn parse(image: &str) -> Result<Self, RegistryError> {
        let trimmed = image.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::invalid_image(image, "empty image reference"));
        }

        let without_digest = trimmed.split('@').next().unwrap_or_default();

        let (host, path) = match without_digest.split_once('/') {
            Some((first, rest)) if is_host(first) => (first.to_lowercase(), rest),
            _ => (DOCKER_HUB_HOST.to_string(), without_digest),
        };

        let repository = match path.rfind(':') {
            Some(index) if !path[index..].contains('/') => &path[..index],
            _ => path,
        };

        if !REPOSITORY_RE.is_match(repository) {
            return Err(RegistryError::invalid_image(
                image,
                format!("invalid repository name '{}'", repository),
            ));
        }

        let registry = if DOCKER_HUB_ALIASES.contains(&host.as_str()) {
            DOCKER_HUB_HOST.to_string()
        } else {
            host
        };

        let repository = if registry == DOCKER_HUB_HOST && !repository.contains('/') {
            format!("{}/{}", OFFICIAL_NAMESPACE, repository)
        } else {
            repository.to_string()
        };

        Ok(Self {
            registry,
            repository,
        })
    }

    /// Whether the image lives on Docker Hub
    pub fn is_docker_hub(&self) -> bool {
        self.registry == DOCKER_HUB_HOST
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.registry, self.repository)
    }
}

/// The first path component names a host when it looks like one
fn is_host(component: &str) -> bool {
    component.contains('.') || component.contains(':') || component == "localhost"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(image: &str) -> (String, String) {
        let r = ImageReference::parse(image).unwrap();
        (r.registry, r.repository)
    }

    #[test]
    fn test_parse_official_image() {
        assert_eq!(parse("alpine"), ("docker.io".into(), "library/alpine".into()));
        assert_eq!(parse("alpine:3.8"), ("docker.io".into(), "library/alpine".into()));
    }

    #[test]
    fn test_parse_docker_hub_namespaced() {
        assert_eq!(
            parse("google/cadvisor:v0.30.2"),
            ("docker.io".into(), "google/cadvisor".into())
        );
        assert_eq!(
            parse("docker.io/google/cadvisor"),
            ("docker.io".into(), "google/cadvisor".into())
        );
        assert_eq!(
            parse("index.docker.io/nginx"),
            ("docker.io".into(), "library/nginx".into())
        );
    }

    #[test]
    fn test_parse_other_registries() {
        assert_eq!(
            parse("gcr.io/google-containers/kube-apiserver:v1.9.6"),
            ("gcr.io".into(), "google-containers/kube-apiserver".into())
        );
        assert_eq!(
            parse("quay.io/coreos/etcd@sha256:abcdef"),
            ("quay.io".into(), "coreos/etcd".into())
        );
        assert_eq!(
            parse("localhost:5000/team/app:1.0"),
            ("localhost:5000".into(), "team/app".into())
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ImageReference::parse("").is_err());
        assert!(ImageReference::parse("Alpine").is_err());
        assert!(ImageReference::parse("https://gitlab.com/foo/bar").is_err());
        assert!(matches!(
            ImageReference::parse("bad//name"),
            Err(RegistryError::InvalidImage { .. })
        ));
    }

    #[test]
    fn test_display_and_docker_hub() {
        let r = ImageReference::parse("alpine").unwrap();
        assert!(r.is_docker_hub());
        assert_eq!(r.to_string(), "docker.io/library/alpine");
        assert!(!ImageReference::parse("quay.io/coreos/etcd").unwrap().is_docker_hub());
    }
}
