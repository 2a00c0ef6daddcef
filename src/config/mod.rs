//! Configuration loading and management

use crate::core::auth::Credential;
use crate::core::error::DEFAULT_FALLBACK_MESSAGE;
use crate::core::resource::{FilterSpec, ResourceKind};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment variable holding the backend domain; `/api` is appended
pub const ENV_API_URL: &str = "CHOIR_API_URL";

/// Environment variable holding a pre-issued bearer token
pub const ENV_API_TOKEN: &str = "CHOIR_API_TOKEN";

/// Configuration of the admin client
///
/// # Example
/// ```yaml
/// api_base_url: https://choir.example.org/api
/// fallback_message: Đã xảy ra lỗi
/// request_timeout_secs: 10
/// upload_base_url: https://files.example.org/uploads
/// search_fields:
///   event: [title, location]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Base URL all resource paths are relative to
    pub api_base_url: String,

    /// Message shown when the backend rejects a call without saying why
    pub fallback_message: String,

    /// Transport timeout; none by default
    pub request_timeout_secs: Option<u64>,

    /// Public base URL of uploaded files
    pub upload_base_url: String,

    /// Per-kind override of the searched fields
    pub search_fields: HashMap<ResourceKind, FilterSpec>,

    /// Pre-issued bearer token; never written back out
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            request_timeout_secs: None,
            upload_base_url: "http://localhost:3000/uploads".to_string(),
            search_fields: HashMap::new(),
            api_token: None,
        }
    }
}

impl AdminConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("parsing config file {}", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CHOIR_API_URL` and `CHOIR_API_TOKEN` from the environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    ///
    /// `CHOIR_API_URL` is the backend's domain; the API lives under `/api`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(domain) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = format!("{}/api", domain.trim().trim_end_matches('/'));
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            bail!("api_base_url must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("api_base_url must be an http(s) URL, got {:?}", url);
        }
        if let Some(kind) = self
            .search_fields
            .iter()
            .find_map(|(kind, spec)| spec.is_empty().then_some(kind))
        {
            bail!("search_fields.{:?} must list at least one field", kind);
        }
        Ok(())
    }

    /// Searched fields for `kind`: the override if configured, else the default
    pub fn filter_spec_for(&self, kind: ResourceKind) -> FilterSpec {
        self.search_fields
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| kind.default_filter_spec())
    }

    /// The configured token as a credential
    pub fn credential(&self) -> Option<Credential> {
        self.api_token.clone().and_then(Credential::bearer)
    }
}
