//! Application error types using thiserror
//!
//! Error hierarchy:
//! - StoreError: Issues reading or writing the persisted manifest
//! - RegistryError: Issues talking to container registries or GitHub
//! - FetchError: The Fetcher contract (empty version list vs. remote failure)
//! - ConfigError: Invalid masks, types or settings supplied by the operator
//! - NotifyError: Failures delivering a change report

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest persistence errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Version fetching errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Remote source errors raised outside of a refresh
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Notification errors
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Writing a report to the terminal failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors related to manifest persistence
#[derive(Error, Debug)]
pub enum StoreError {
    /// Manifest file or document does not exist
    #[error("manifest {path} does not exist")]
    NotFound { path: PathBuf },

    /// Refusing to overwrite an existing manifest
    #[error("file {path} already exists, refusing to overwrite")]
    AlreadyExists { path: PathBuf },

    /// A directory sits where the manifest file is expected
    #[error("expected {path} to be a file, instead found a directory")]
    IsDirectory { path: PathBuf },

    /// Failed to read the manifest
    #[error("could not read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the manifest
    #[error("could not write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest content is malformed
    #[error("could not parse manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Manifest could not be serialized
    #[error("could not serialize manifest: {message}")]
    Serialize { message: String },
}

/// Errors related to container registries and the GitHub API
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Image or repository not found
    #[error("'{source_name}' not found in {registry}")]
    NotFound {
        source_name: String,
        registry: String,
    },

    /// Network request failed
    #[error("failed to fetch '{source_name}' from {registry}: {message}")]
    Network {
        source_name: String,
        registry: String,
        message: String,
    },

    /// Request timed out
    #[error("timeout while fetching '{source_name}' from {registry}")]
    Timeout {
        source_name: String,
        registry: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry}")]
    RateLimited { registry: String },

    /// Unexpected HTTP status
    #[error("got a bad return code {status} for '{source_name}' from {registry}")]
    BadStatus {
        source_name: String,
        registry: String,
        status: u16,
    },

    /// Response body could not be decoded
    #[error("invalid response from {registry} for '{source_name}': {message}")]
    InvalidResponse {
        source_name: String,
        registry: String,
        message: String,
    },

    /// Authentication against the registry failed
    #[error("authentication failed for {registry}: {message}")]
    Authentication { registry: String, message: String },

    /// Image is hosted on a registry without a client
    #[error("unsupported registry '{registry}'")]
    UnsupportedRegistry { registry: String },

    /// Image reference could not be parsed
    #[error("could not parse image '{image}': {message}")]
    InvalidImage { image: String, message: String },
}

/// Errors produced by a Fetcher
#[derive(Error, Debug)]
pub enum FetchError {
    /// No candidate versions remain after masking
    #[error("could not find latest tag")]
    EmptyVersionList,

    /// Source identifier is not valid for this fetcher
    #[error("invalid source '{source_name}': {message}")]
    InvalidSource {
        source_name: String,
        message: String,
    },

    /// Remote source failure
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors related to operator-supplied configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Mask is not a valid regular expression
    #[error("invalid mask '{mask}': {message}")]
    InvalidMask { mask: String, message: String },

    /// Dependency type is not one of the accepted values
    #[error("{value:?} is not a valid type, expected \"github\", \"docker\" or \"manual\"")]
    InvalidType { value: String },

    /// Dependency with the same name is already declared
    #[error("dependency not added, {name:?} is already in the config file")]
    DuplicateDependency { name: String },

    /// Setting has a value that cannot be used
    #[error("invalid value '{value}' for {key}: {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

/// Errors related to delivering change reports
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Writing the report failed
    #[error("could not deliver notification: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        StoreError::NotFound { path: path.into() }
    }

    /// Creates a new AlreadyExists error
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        StoreError::AlreadyExists { path: path.into() }
    }

    /// Creates a new IsDirectory error
    pub fn is_directory(path: impl Into<PathBuf>) -> Self {
        StoreError::IsDirectory { path: path.into() }
    }

    /// Creates a new Read error
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        StoreError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true for the "nothing persisted yet" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl RegistryError {
    /// Creates a new NotFound error
    pub fn not_found(source_name: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::NotFound {
            source_name: source_name.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new Network error
    pub fn network(
        source_name: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::Network {
            source_name: source_name.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        source_name: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            source_name: source_name.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidImage error
    pub fn invalid_image(image: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidImage {
            image: image.into(),
            message: message.into(),
        }
    }
}

impl FetchError {
    /// Creates a new InvalidSource error
    pub fn invalid_source(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::InvalidSource {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}
