//! Manifest output for the terminal
//!
//! This module provides:
//! - Table output for human-readable display
//! - YAML and JSON output for machine processing
//! - Filtering by type or outdated status

mod serialized;
mod table;

use crate::domain::{Manifest, Spec};
use clap::ValueEnum;
use std::io::{self, Write};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    Table,
    /// The manifest as YAML
    #[default]
    Yaml,
    /// The manifest as indented JSON
    Json,
}

/// Which dependencies to include in the output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Only dependencies whose latest version differs from the current one
    pub outdated: bool,
    /// Only these types (empty means all)
    pub types: Vec<String>,
}

impl FilterOptions {
    /// Whether a dependency passes the filter
    pub fn accepts(&self, spec: &Spec) -> bool {
        if !self.types.is_empty() {
            let kind = spec.effective_type();
            if !self.types.iter().any(|t| t == kind.as_str()) {
                return false;
            }
        }

        !(self.outdated && spec.version == spec.latest_version)
    }

    /// Apply the filter, keeping order and schema version
    pub fn apply(&self, manifest: &Manifest) -> Manifest {
        let mut filtered = Manifest::new(manifest.api_version.clone());
        filtered.dependencies = manifest
            .dependencies
            .iter()
            .filter(|s| self.accepts(s))
            .cloned()
            .collect();
        filtered
    }
}

/// Writes manifests in the selected format
#[derive(Debug, Clone, Default)]
pub struct ManifestWriter {
    filter: FilterOptions,
}

impl ManifestWriter {
    /// Create a writer with the given filter
    pub fn new(filter: FilterOptions) -> Self {
        Self { filter }
    }

    /// Write a manifest
    pub fn write(&self, format: OutputFormat, manifest: &Manifest, out: &mut dyn Write) -> io::Result<()> {
        let filtered = self.filter.apply(manifest);
        match format {
            OutputFormat::Table => table::write_table(&filtered, out),
            OutputFormat::Yaml => serialized::write_yaml(&filtered, out),
            OutputFormat::Json => serialized::write_json(&filtered, out),
        }
    }
}
