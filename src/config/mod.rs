#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];

/// Where the live source lives. Both values absent is static-site mode, not an error.
///
/// Every field stays optional while layers are merged; the timeout default
/// applies only when a client is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl SourceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(*name))
                .find(|value| !value.trim().is_empty())
        };

        Self {
            url: first(&URL_VARS[..]),
            anon_key: first(&KEY_VARS[..]),
            timeout_seconds: None,
        }
    }

    /// Values set in `other` win.
    pub fn overlay(self, other: SourceConfig) -> Self {
        Self {
            url: other.url.or(self.url),
            anon_key: other.anon_key.or(self.anon_key),
            timeout_seconds: other.timeout_seconds.or(self.timeout_seconds),
        }
    }

    pub fn timeout(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().filter(|v| !v.trim().is_empty())?;
        let key = self.anon_key.as_deref().filter(|v| !v.trim().is_empty())?;
        Some((url, key))
    }

    pub fn is_available(&self) -> bool {
        self.credentials().is_some()
    }
}

impl Validate for SourceConfig {
    /// Neither credential is fine (static-site mode); exactly one is a mistake.
    fn validate(&self) -> Result<()> {
        match (&self.url, &self.anon_key) {
            (Some(url), Some(key)) => {
                validate_url("source.url", url)?;
                validate_non_empty_string("source.anon_key", key)?;
            }
            (Some(_), None) => return Err(missing("source.anon_key")),
            (None, Some(_)) => return Err(missing("source.url")),
            (None, None) => {}
        }
        validate_positive_number("source.timeout_seconds", self.timeout(), 1)
    }
}

fn missing(field: &str) -> ContentError {
    ContentError::MissingConfigError {
        field: field.to_string(),
    }
}
