//! Core domain models for gofer
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency type classification
//! - Dependency declarations with their identity hash
//! - The manifest and its refresh cycle

mod dependency_type;
mod manifest;
mod spec;

pub use dependency_type::DependencyType;
pub use manifest::{Manifest, API_VERSION, NOTE_NO_LATEST_TAG, NOTE_UNKNOWN_TYPE};
pub use spec::Spec;
