//! Remote version sources
//!
//! This module provides:
//! - HTTP client shared foundation with error mapping and pagination
//! - Container image reference parsing
//! - Registry v2 tag listing for Docker Hub, gcr.io and quay.io
//! - GitHub releases listing

mod client;
mod docker;
mod github;
mod image;

pub use client::{Credentials, HttpClient, Page, DEFAULT_TIMEOUT};
pub use docker::DockerRegistry;
pub use github::{GithubReleases, GithubRepo};
pub use image::ImageReference;
