//! Manifest of declared dependencies and the refresh cycle

use super::{DependencyType, Spec};
use crate::error::FetchError;
use crate::fetcher::Fetchers;
use crate::progress::Progress;
use crate::version::Mask;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Current manifest schema version
pub const API_VERSION: &str = "v0.1";

/// Note recorded when no tag survives the mask
pub const NOTE_NO_LATEST_TAG: &str = "could not find latest tag";

/// Note recorded for dependencies of unknown type
pub const NOTE_UNKNOWN_TYPE: &str = "could not determine type";

/// Ordered collection of dependencies plus the schema version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Schema marker
    #[serde(rename = "apiVersion", alias = "apiversion", default)]
    pub api_version: String,
    /// Declared dependencies in insertion order
    #[serde(default)]
    pub dependencies: Vec<Spec>,
}

impl Manifest {
    /// Create an empty manifest stamped with the given schema version
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            dependencies: Vec::new(),
        }
    }

    /// Number of dependencies
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Whether the manifest declares nothing
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Add a dependency unless one with the same name exists
    ///
    /// Returns false when the dependency was not added.
    pub fn append(&mut self, spec: Spec) -> bool {
        if self.find(&spec.name).is_some() {
            return false;
        }
        self.dependencies.push(spec);
        true
    }

    /// Find a dependency by name
    pub fn find(&self, name: &str) -> Option<&Spec> {
        self.dependencies.iter().find(|s| s.name == name)
    }

    /// Refresh every dependency against its source
    ///
    /// Returns a new manifest; `self` is left untouched. Per-dependency
    /// failures are recorded in the spec notes and never abort the run.
    pub async fn latest(&self, fetchers: &Fetchers) -> Manifest {
        self.latest_with_progress(fetchers, &mut Progress::disabled())
            .await
    }

    /// Refresh every dependency, reporting progress as each one completes
    pub async fn latest_with_progress(&self, fetchers: &Fetchers, progress: &mut Progress) -> Manifest {
        let mut refreshed = Manifest::new(self.api_version.clone());
        progress.start(self.dependencies.len() as u64, "Digging");

        for spec in &self.dependencies {
            progress.set_message(&spec.name);
            refreshed.dependencies.push(refresh(spec, fetchers).await);
            progress.inc();
        }

        progress.finish_and_clear();
        refreshed
    }

    /// Convert into an identity-keyed map
    ///
    /// Specs sharing an identity collapse into one entry, the later wins.
    pub fn to_map(&self) -> (String, BTreeMap<String, Spec>) {
        let map = self
            .dependencies
            .iter()
            .map(|spec| (spec.identity_hash(), spec.clone()))
            .collect();
        (self.api_version.clone(), map)
    }

    /// Rebuild a manifest from an identity-keyed map, in key order
    pub fn from_map(api_version: impl Into<String>, map: BTreeMap<String, Spec>) -> Self {
        Self {
            api_version: api_version.into(),
            dependencies: map.into_values().collect(),
        }
    }
}

/// Resolve the latest version for a single dependency
async fn refresh(spec: &Spec, fetchers: &Fetchers) -> Spec {
    let mut spec = spec.clone();
    let kind = spec.effective_type();
    debug!(name = %spec.name, kind = %kind, "refreshing dependency");

    match &kind {
        fetchable if fetchable.is_fetchable() => match Mask::new(&spec.mask) {
            Ok(mask) => {
                let fetcher = fetchers.for_type(fetchable);
                match fetcher.latest_version(&spec.name, &mask).await {
                    Ok(latest) => {
                        spec.latest_version = latest.into_inner();
                        spec.notes.clear();
                    }
                    Err(FetchError::EmptyVersionList) => {
                        spec.latest_version.clear();
                        spec.notes = NOTE_NO_LATEST_TAG.to_string();
                    }
                    Err(e) => {
                        warn!(name = %spec.name, error = %e, "could not fetch latest version");
                        spec.latest_version.clear();
                        spec.notes = format!("error getting latest version: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!(name = %spec.name, error = %e, "skipping dependency with invalid mask");
                spec.latest_version.clear();
                spec.notes = e.to_string();
            }
        },
        DependencyType::Unknown => {
            spec.notes = NOTE_UNKNOWN_TYPE.to_string();
        }
        DependencyType::Other(value) => {
            spec.notes = format!("unhandled type {:?}", value);
        }
        _ => {}
    }

    spec.kind = Some(kind);
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::fetcher::Fetcher;
    use crate::version::VersionSet;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Fetcher answering from a fixed table of tags per source
    struct StaticFetcher {
        kind: DependencyType,
        tags: HashMap<String, Vec<&'static str>>,
    }

    impl StaticFetcher {
        fn new(kind: DependencyType, entries: &[(&str, Vec<&'static str>)]) -> Self {
            Self {
                kind,
                tags: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        fn kind(&self) -> DependencyType {
            self.kind.clone()
        }

        async fn all_versions(&self, source: &str, mask: &Mask) -> Result<VersionSet, FetchError> {
            match self.tags.get(source) {
                Some(tags) => Ok(tags.iter().copied().collect::<VersionSet>().filter(mask)),
                None => Err(RegistryError::not_found(source, "static").into()),
            }
        }
    }

    fn fetchers() -> Fetchers {
        Fetchers::new(
            Box::new(StaticFetcher::new(
                DependencyType::Docker,
                &[
                    ("alpine", vec!["2.6", "3.7", "3.8", "edge", "latest"]),
                    ("google/cadvisor", vec!["v0.28.1", "v0.29.2", "v0.30.2"]),
                ],
            )),
            Box::new(StaticFetcher::new(
                DependencyType::Github,
                &[(
                    "https://github.com/kubernetes/kubernetes",
                    vec!["v1.9.6", "v1.9.9", "v1.10.0"],
                )],
            )),
        )
    }

    #[test]
    fn test_append_rejects_duplicate_name() {
        let mut manifest = Manifest::new(API_VERSION);
        assert!(manifest.append(Spec::new("alpine", "3.7")));
        assert!(!manifest.append(Spec::new("alpine", "3.8").with_mask("3.[0-9]+")));
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.find("alpine").unwrap().version, "3.7");
    }

    #[test]
    fn test_map_roundtrip_preserves_specs() {
        let mut manifest = Manifest::new(API_VERSION);
        manifest.append(Spec::new("alpine", "3.7"));
        manifest.append(Spec::new("https://github.com/helm/helm", "v3.0.0").with_mask("v3.[0-9]+.[0-9]+"));
        manifest.append(Spec::new("manual", "1.0"));

        let (api_version, map) = manifest.to_map();
        assert_eq!(map.len(), 3);
        let rebuilt = Manifest::from_map(api_version, map);

        assert_eq!(rebuilt.api_version, API_VERSION);
        assert_eq!(rebuilt.len(), manifest.len());
        for spec in &manifest.dependencies {
            assert!(rebuilt.dependencies.contains(spec));
        }
    }

    #[test]
    fn test_from_map_orders_by_identity_hash() {
        let mut manifest = Manifest::new(API_VERSION);
        manifest.append(Spec::new("b", "1"));
        manifest.append(Spec::new("a", "1"));
        manifest.append(Spec::new("c", "1"));

        let (_, map) = manifest.to_map();
        let keys: Vec<String> = map.keys().cloned().collect();
        let rebuilt = Manifest::from_map(API_VERSION, map);
        let hashes: Vec<String> = rebuilt.dependencies.iter().map(Spec::identity_hash).collect();
        assert_eq!(hashes, keys);
    }

    #[test]
    fn test_yaml_accepts_lowercase_api_version_key() {
        let manifest: Manifest =
            serde_yaml::from_str("apiversion: v0.1\ndependencies:\n  - name: alpine\n    version: \"3.8\"\n")
                .unwrap();
        assert_eq!(manifest.api_version, "v0.1");
        assert_eq!(manifest.dependencies[0].name, "alpine");
    }

    #[tokio::test]
    async fn test_latest_resolves_docker_and_github() {
        let mut manifest = Manifest::new(API_VERSION);
        manifest.append(Spec::new("alpine", "3.7"));
        manifest.append(
            Spec::new("https://github.com/kubernetes/kubernetes", "v1.9.6").with_mask("v1.9.[0-9]+"),
        );

        let refreshed = manifest.latest(&fetchers()).await;

        assert_eq!(refreshed.api_version, API_VERSION);
        assert_eq!(refreshed.dependencies[0].latest_version, "3.8");
        assert_eq!(refreshed.dependencies[0].kind, Some(DependencyType::Docker));
        assert_eq!(refreshed.dependencies[1].latest_version, "v1.9.9");
        assert_eq!(refreshed.dependencies[1].kind, Some(DependencyType::Github));
        assert!(refreshed.dependencies.iter().all(|s| s.notes.is_empty()));
    }

    #[tokio::test]
    async fn test_latest_does_not_mutate_input() {
        let mut manifest = Manifest::new(API_VERSION);
        manifest.append(Spec::new("alpine", "3.7"));
        let before = manifest.clone();

        let _ = manifest.latest(&fetchers()).await;
        assert_eq!(manifest, before);
    }

    #[tokio::test]
    async fn test_latest_empty_result_becomes_note() {
        let mut manifest = Manifest::new(API_VERSION);
        manifest.append(
            Spec::new("google/cadvisor", "v0.28.1")
                .with_mask("v0.31.[0-9]+")
                .with_latest_version("v0.30.2"),
        );

        let refreshed = manifest.latest(&fetchers()).await;
        let spec = &refreshed.dependencies[0];
        assert_eq!(spec.notes, NOTE_NO_LATEST_TAG);
        assert_eq!(spec.latest_version, "");
    }

    #[tokio::test]
    async fn test_latest_fetch_error_becomes_note() {
        let mut manifest = Manifest::new(API_VERSION);
        manifest.append(Spec::new("does/not-exist", "1.0"));
        manifest.append(Spec::new("alpine", "3.7"));

        let refreshed = manifest.latest(&fetchers()).await;
        assert!(refreshed.dependencies[0]
            .notes
            .starts_with("error getting latest version:"));
        assert_eq!(refreshed.dependencies[0].latest_version, "");
        assert_eq!(refreshed.dependencies[1].latest_version, "3.8");
    }

    #[tokio::test]
    async fn test_latest_invalid_mask_becomes_note() {
        let mut manifest = Manifest::new(API_VERSION);
        manifest.append(Spec::new("alpine", "3.7").with_mask("3.("));

        let refreshed = manifest.latest(&fetchers()).await;
        assert!(refreshed.dependencies[0].notes.starts_with("invalid mask '3.('"));
    }

    #[tokio::test]
    async fn test_latest_skips_manual_and_annotates_other_types() {
        let mut manifest = Manifest::new(API_VERSION);
        manifest.append(Spec::new("manual", "1.0").with_latest_version("1.1"));
        manifest.append(Spec::new("thing", "1.0").with_type(DependencyType::Unknown));
        manifest.append(Spec::new("chart", "1.0").with_type(DependencyType::Other("helm".to_string())));

        let refreshed = manifest.latest(&fetchers()).await;

        assert_eq!(refreshed.dependencies[0].latest_version, "1.1");
        assert_eq!(refreshed.dependencies[0].notes, "");
        assert_eq!(refreshed.dependencies[0].kind, Some(DependencyType::Manual));
        assert_eq!(refreshed.dependencies[1].notes, NOTE_UNKNOWN_TYPE);
        assert_eq!(refreshed.dependencies[2].notes, "unhandled type \"helm\"");
    }

    #[tokio::test]
    async fn test_latest_preserves_order() {
        let mut manifest = Manifest::new(API_VERSION);
        for name in ["manual", "alpine", "google/cadvisor"] {
            manifest.append(Spec::new(name, "0"));
        }

        let refreshed = manifest.latest(&fetchers()).await;
        let names: Vec<&str> = refreshed.dependencies.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["manual", "alpine", "google/cadvisor"]);
    }
}
