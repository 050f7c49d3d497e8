//! gofer - Dependency version tracker library
//!
//! This library keeps a manifest of external dependencies and finds their
//! latest published versions:
//! - Container images (Docker Hub, gcr.io, quay.io)
//! - GitHub releases
//! - Manually tracked dependencies

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod notifier;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod reconcile;
pub mod registry;
pub mod store;
pub mod version;
