//! Dependency type classification

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Prefixes identifying a GitHub-hosted source
const GITHUB_PREFIXES: &[&str] = &["https://github.com/", "github.com/"];

/// Marker name for manually tracked dependencies
const MANUAL_MARKER: &str = "manual";

/// Kind of source a dependency is tracked against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyType {
    /// Container image in a registry
    Docker,
    /// GitHub repository releases
    Github,
    /// Tracked by hand, never fetched
    Manual,
    /// Type could not be determined
    Unknown,
    /// Any other type read from a manifest
    Other(String),
}

impl DependencyType {
    /// Returns the manifest representation of this type
    pub fn as_str(&self) -> &str {
        match self {
            DependencyType::Docker => "docker",
            DependencyType::Github => "github",
            DependencyType::Manual => "manual",
            DependencyType::Unknown => "unknown",
            DependencyType::Other(value) => value,
        }
    }

    /// Infer the type from a source name
    ///
    /// Anything that is neither the manual marker nor a GitHub URL is
    /// assumed to be a container image.
    pub fn determine(source: &str) -> Self {
        if source == MANUAL_MARKER {
            return DependencyType::Manual;
        }

        if GITHUB_PREFIXES.iter().any(|p| source.starts_with(p)) {
            DependencyType::Github
        } else {
            DependencyType::Docker
        }
    }

    /// Parse a type supplied by an operator; only fetchable kinds and
    /// manual are accepted
    pub fn parse_declared(value: &str) -> Result<Self, ConfigError> {
        match DependencyType::from(value) {
            t @ (DependencyType::Docker | DependencyType::Github | DependencyType::Manual) => Ok(t),
            _ => Err(ConfigError::InvalidType {
                value: value.to_string(),
            }),
        }
    }

    /// Whether a Fetcher exists for this type
    pub fn is_fetchable(&self) -> bool {
        matches!(self, DependencyType::Docker | DependencyType::Github)
    }
}

impl From<&str> for DependencyType {
    fn from(value: &str) -> Self {
        match value {
            "docker" => DependencyType::Docker,
            "github" => DependencyType::Github,
            "manual" => DependencyType::Manual,
            "unknown" => DependencyType::Unknown,
            other => DependencyType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for DependencyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DependencyType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(DependencyType::from(value.as_str()))
    }
}
