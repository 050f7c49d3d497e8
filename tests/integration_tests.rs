//! Integration tests for gofer
//!
//! These tests verify:
//! - Refreshing a manifest against mocked registries and GitHub
//! - Manifest file round trips and listing output
//! - The reconcile cycle against the document store

use gofer::config::RegistryConfig;
use gofer::domain::{DependencyType, Manifest, Spec, API_VERSION, NOTE_NO_LATEST_TAG};
use gofer::fetcher::Fetchers;
use mockito::{Matcher, Server, ServerGuard};
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Registry configuration pointing every endpoint at the mock server
fn registry_config(server: &ServerGuard) -> RegistryConfig {
    RegistryConfig {
        docker_hub_url: server.url(),
        docker_auth_url: format!("{}/token", server.url()),
        gcr_url: server.url(),
        quay_url: server.url(),
        github_api_url: server.url(),
        ..RegistryConfig::default()
    }
}

fn sample_manifest() -> Manifest {
    let mut manifest = Manifest::new(API_VERSION);
    manifest.append(Spec::new("alpine", "3.7").with_mask("3.[0-9]+"));
    manifest.append(Spec::new("https://github.com/helm/helm", "v2.9.0"));
    manifest.append(Spec::new("quay.io/coreos/etcd", "v3.3.0").with_mask("v4.[0-9]+.[0-9]+"));
    manifest.append(Spec::new("gcr.io/missing/image", "1.0"));
    manifest.append(Spec::new("notes", "2018-01-01").with_type(DependencyType::Manual));
    manifest
}

mod refresh {
    use super::*;

    #[tokio::test]
    async fn test_latest_against_mocked_sources() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("GET", "/token")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"token": "hub-token"}"#)
            .create_async()
            .await;
        let _alpine = server
            .mock("GET", "/v2/library/alpine/tags/list")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"tags": ["2.6", "3.6", "3.7", "3.8", "edge", "latest"]}"#)
            .create_async()
            .await;
        let _helm = server
            .mock("GET", "/repos/helm/helm/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "v2.10.0-rc.1", "draft": false},
                    {"tag_name": "v2.9.1", "draft": false},
                    {"tag_name": "v2.9.0", "draft": false},
                    {"tag_name": "v3.0.0", "draft": true}
                ]"#,
            )
            .create_async()
            .await;
        let _etcd = server
            .mock("GET", "/v2/coreos/etcd/tags/list")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"tags": ["v3.3.0", "v3.3.1"]}"#)
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/v2/missing/image/tags/list")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let fetchers = Fetchers::from_config(&registry_config(&server)).unwrap();
        let manifest = sample_manifest();
        let refreshed = manifest.latest(&fetchers).await;

        // Input is untouched and order is preserved
        assert_eq!(manifest, sample_manifest());
        let names: Vec<&str> = refreshed.dependencies.iter().map(|s| s.name.as_str()).collect();
        let expected: Vec<&str> = manifest.dependencies.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, expected);

        let alpine = refreshed.find("alpine").unwrap();
        assert_eq!(alpine.latest_version, "3.8");
        assert_eq!(alpine.kind, Some(DependencyType::Docker));
        assert!(alpine.notes.is_empty());

        let helm = refreshed.find("https://github.com/helm/helm").unwrap();
        assert_eq!(helm.latest_version, "v2.10.0-rc.1");
        assert_eq!(helm.kind, Some(DependencyType::Github));

        let etcd = refreshed.find("quay.io/coreos/etcd").unwrap();
        assert!(etcd.latest_version.is_empty());
        assert_eq!(etcd.notes, NOTE_NO_LATEST_TAG);

        let missing = refreshed.find("gcr.io/missing/image").unwrap();
        assert!(missing.latest_version.is_empty());
        assert!(missing.notes.starts_with("error getting latest version"));

        let notes = refreshed.find("notes").unwrap();
        assert!(notes.latest_version.is_empty());
        assert!(notes.notes.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_and_unhandled_types() {
        let server = Server::new_async().await;
        let fetchers = Fetchers::from_config(&registry_config(&server)).unwrap();

        let mut manifest = Manifest::new(API_VERSION);
        manifest.append(Spec::new("mystery", "1").with_type(DependencyType::Unknown));
        manifest.append(Spec::new("npm-thing", "1").with_type(DependencyType::from("npm")));

        let refreshed = manifest.latest(&fetchers).await;
        assert_eq!(refreshed.dependencies[0].notes, "could not determine type");
        assert_eq!(refreshed.dependencies[1].notes, "unhandled type \"npm\"");
    }
}

mod manifest_files {
    use super::*;
    use gofer::output::{FilterOptions, ManifestWriter, OutputFormat};
    use gofer::store::{FileStore, ReadWriter};

    #[test]
    fn test_file_store_round_trip_and_listing() {
        let dir = create_test_dir();
        let store = FileStore::new(dir.path().join(".gofer").join("config.yaml"));
        store.init(API_VERSION, &sample_manifest().dependencies).unwrap();

        let mut manifest = store.read().unwrap();
        assert_eq!(manifest, sample_manifest());

        manifest.dependencies[0].latest_version = "3.8".to_string();
        store.write(&manifest).unwrap();

        let writer = ManifestWriter::new(FilterOptions {
            outdated: true,
            types: vec!["docker".to_string()],
        });
        let mut out = Vec::new();
        writer
            .write(OutputFormat::Json, &store.read().unwrap(), &mut out)
            .unwrap();
        let listed: Manifest = serde_json::from_slice(&out).unwrap();

        // Docker specs with version != latestVersion, including unresolved ones
        let names: Vec<&str> = listed.dependencies.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["alpine", "quay.io/coreos/etcd", "gcr.io/missing/image"]
        );
    }

    #[test]
    fn test_map_round_trip_keeps_specs() {
        let manifest = sample_manifest();
        let (api_version, map) = manifest.to_map();
        let rebuilt = Manifest::from_map(api_version, map);

        assert_eq!(rebuilt.api_version, manifest.api_version);
        assert_eq!(rebuilt.len(), manifest.len());
        for spec in &manifest.dependencies {
            assert!(rebuilt.dependencies.contains(spec));
        }
    }
}

mod reconcile_cycle {
    use super::*;
    use gofer::error::NotifyError;
    use gofer::notifier::Notifier;
    use gofer::orchestrator::Orchestrator;
    use gofer::store::{DocumentStore, ReadWriter};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Collected(Arc<Mutex<Vec<String>>>);

    impl Notifier for Collected {
        fn send(&mut self, new: &[Spec], updated: &[Spec]) -> Result<(), NotifyError> {
            let mut lines = self.0.lock().unwrap();
            lines.extend(new.iter().map(|s| format!("new {}", s.name)));
            lines.extend(updated.iter().map(|s| format!("updated {}", s.name)));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sync_twice_against_mocked_registry() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("GET", "/token")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"token": "hub-token"}"#)
            .create_async()
            .await;
        let _alpine = server
            .mock("GET", "/v2/library/alpine/tags/list")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"tags": ["3.7", "3.8"]}"#)
            .create_async()
            .await;

        let dir = create_test_dir();
        let path = dir.path().join("dependencies").join("manifest.json");
        let seeds = vec![Spec::new("alpine", "3.7")];

        let first = Collected::default();
        let mut orchestrator = Orchestrator::new(
            Box::new(DocumentStore::at(&path)),
            Box::new(first.clone()),
            Fetchers::from_config(&registry_config(&server)).unwrap(),
            API_VERSION,
        );
        let result = orchestrator.run(&seeds).await.unwrap();
        assert_eq!(result.new, 1);
        assert_eq!(*first.0.lock().unwrap(), vec!["new alpine"]);

        let second = Collected::default();
        let mut orchestrator = Orchestrator::new(
            Box::new(DocumentStore::at(&path)),
            Box::new(second.clone()),
            Fetchers::from_config(&registry_config(&server)).unwrap(),
            API_VERSION,
        );
        let result = orchestrator.run(&seeds).await.unwrap();
        assert_eq!(result.updated, 1);
        assert_eq!(*second.0.lock().unwrap(), vec!["updated alpine"]);

        let stored = DocumentStore::at(&path).read().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.dependencies[0].version, "3.7");
        assert_eq!(stored.dependencies[0].latest_version, "3.8");
    }
}
