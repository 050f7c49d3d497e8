//! Dependency declaration

use super::DependencyType;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A single declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    /// Source identifier: image reference, repository URL or `manual`
    pub name: String,
    /// Declared type; None means it is inferred from the name
    #[serde(rename = "type", default, with = "declared_type")]
    pub kind: Option<DependencyType>,
    /// Version currently in use
    #[serde(default)]
    pub version: String,
    /// Most recently resolved version, empty when unresolved
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub latest_version: String,
    /// Regular expression restricting candidate tags
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mask: String,
    /// Status annotation, empty when there is no issue
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Spec {
    /// Create a spec with an inferred type and no mask
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            version: version.into(),
            latest_version: String::new(),
            mask: String::new(),
            notes: String::new(),
        }
    }

    /// Set an explicit type
    pub fn with_type(mut self, kind: DependencyType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the version mask
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = mask.into();
        self
    }

    /// Set the latest resolved version
    pub fn with_latest_version(mut self, latest_version: impl Into<String>) -> Self {
        self.latest_version = latest_version.into();
        self
    }

    /// The declared type, or the one inferred from the name
    pub fn effective_type(&self) -> DependencyType {
        match &self.kind {
            Some(kind) => kind.clone(),
            None => DependencyType::determine(&self.name),
        }
    }

    /// Stable identity key: SHA-256 of name, effective type and mask
    ///
    /// Versions and notes do not take part, so a refresh never changes
    /// the identity of a dependency.
    pub fn identity_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update(self.effective_type().as_str().as_bytes());
        hasher.update(self.mask.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Whether a newer version than the one in use has been resolved
    pub fn is_outdated(&self) -> bool {
        !self.latest_version.is_empty() && self.latest_version != self.version
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.effective_type())?;
        if self.is_outdated() {
            write!(f, " {} -> {}", self.version, self.latest_version)?;
        } else {
            write!(f, " {}", self.version)?;
        }
        if !self.notes.is_empty() {
            write!(f, " [{}]", self.notes)?;
        }
        Ok(())
    }
}

/// Maps the optional declared type to a plain string, empty meaning None
mod declared_type {
    use super::DependencyType;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        kind: &Option<DependencyType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(kind.as_ref().map(|k| k.as_str()).unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DependencyType>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(DependencyType::from(value.as_str())))
        }
    }
}
