//! Version masks
//!
//! A mask is a regular expression that a tag must match in full to be
//! considered a candidate. The empty mask accepts every tag.

use crate::error::ConfigError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Anchored regular expression restricting eligible tags
#[derive(Debug, Clone)]
pub struct Mask {
    /// Pattern as the operator wrote it
    source: String,
    /// Compiled `^(?:pattern)$`, None for the empty mask
    regex: Option<Regex>,
}

impl Mask {
    /// Compile a mask, failing on invalid regular expressions
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Ok(Self::any());
        }

        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            ConfigError::InvalidMask {
                mask: pattern.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex: Some(regex),
        })
    }

    /// The mask that accepts every tag
    pub fn any() -> Self {
        Self {
            source: String::new(),
            regex: None,
        }
    }

    /// Whether this mask filters nothing
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether the whole tag matches
    pub fn matches(&self, tag: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(tag),
            None => true,
        }
    }
}

impl Default for Mask {
    fn default() -> Self {
        Self::any()
    }
}

impl FromStr for Mask {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
