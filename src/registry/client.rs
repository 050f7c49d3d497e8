//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Bearer and Basic credentials per request
//! - Status code to error mapping
//! - `Link` header pagination helpers

use crate::error::RegistryError;
use reqwest::header::{HeaderMap, LINK};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("gofer/", env!("CARGO_PKG_VERSION"));

/// Header GitHub uses to report the remaining request quota
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Credentials attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    /// No Authorization header
    #[default]
    Anonymous,
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Basic <base64(username:password)>`
    Basic { username: String, password: String },
}

/// One page of a paginated response
#[derive(Debug)]
pub struct Page<T> {
    /// Decoded body
    pub body: T,
    /// Absolute URL of the next page, if any
    pub next: Option<String>,
}

/// HTTP client wrapper with error mapping
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, RegistryError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { client })
    }

    /// Perform a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credentials: &Credentials,
        source: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        Ok(self.get_page(url, credentials, source, registry).await?.body)
    }

    /// Perform a GET request, decode the JSON body and resolve the next
    /// page from the `Link` header
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        credentials: &Credentials,
        source: &str,
        registry: &str,
    ) -> Result<Page<T>, RegistryError> {
        debug!(url = %url, registry = %registry, "GET");

        let mut request = self.client.get(url);
        request = match credentials {
            Credentials::Anonymous => request,
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RegistryError::Timeout {
                    source_name: source.to_string(),
                    registry: registry.to_string(),
                }
            } else {
                RegistryError::network(source, registry, e.to_string())
            }
        })?;

        check_status(response.status(), response.headers(), source, registry)?;

        let next = match response.headers().get(LINK).and_then(|v| v.to_str().ok()) {
            Some(header) => match next_link(header) {
                Some(link) => Some(resolve_link(url, &link, source, registry)?),
                None => None,
            },
            None => None,
        };

        let body = response.json::<T>().await.map_err(|e| {
            RegistryError::invalid_response(source, registry, format!("failed to parse JSON: {}", e))
        })?;

        Ok(Page { body, next })
    }
}

/// Map an HTTP status to a registry error
fn check_status(
    status: StatusCode,
    headers: &HeaderMap,
    source: &str,
    registry: &str,
) -> Result<(), RegistryError> {
    if status.is_success() {
        return Ok(());
    }

    let quota_exhausted = headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false);

    match status {
        StatusCode::NOT_FOUND => Err(RegistryError::not_found(source, registry)),
        StatusCode::TOO_MANY_REQUESTS => Err(RegistryError::RateLimited {
            registry: registry.to_string(),
        }),
        StatusCode::FORBIDDEN if quota_exhausted => Err(RegistryError::RateLimited {
            registry: registry.to_string(),
        }),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RegistryError::Authentication {
            registry: registry.to_string(),
            message: format!("HTTP {}", status.as_u16()),
        }),
        _ => Err(RegistryError::BadStatus {
            source_name: source.to_string(),
            registry: registry.to_string(),
            status: status.as_u16(),
        }),
    }
}

/// Extract the `rel="next"` target from a `Link` header
fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|p| {
            let p = p.trim();
            p == r#"rel="next""# || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')?
            .strip_suffix('>')
            .map(str::to_string)
    })
}

/// Resolve a possibly relative link against the URL it was served from
fn resolve_link(
    base: &str,
    link: &str,
    source: &str,
    registry: &str,
) -> Result<String, RegistryError> {
    Url::parse(base)
        .and_then(|b| b.join(link))
        .map(String::from)
        .map_err(|e| {
            RegistryError::invalid_response(
                source,
                registry,
                format!("invalid pagination link '{}': {}", link, e),
            )
        })
}
