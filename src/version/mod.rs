//! Version resolution
//!
//! This module provides:
//! - Loose normalization and comparison of version tags
//! - Version sets with latest selection
//! - Anchored masks for filtering candidate tags

mod compare;
mod mask;
mod versioned;

pub use compare::{compare, normalize, normalize_branch};
pub use mask::Mask;
pub use versioned::{VersionSet, Versioned};
