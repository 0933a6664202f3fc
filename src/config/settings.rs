// Configuration structs

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::*;
use crate::providers::ModelCallParameters;

/// Which fallback tier a [`TierConfig`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    Primary,
    Secondary,
}

impl TierKind {
    pub fn label(self) -> &'static str {
        match self {
            TierKind::Primary => "primary",
            TierKind::Secondary => "secondary",
        }
    }
}

/// One model tier: credential, endpoint and fixed call parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Provider credential. Absent (or blank) disables the tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL (without `/v1/...`)
    pub base_url: String,

    /// Model id requested from the provider
    pub model: String,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Upper bound on one model call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_CALL_TIMEOUT_SECS
}

impl TierConfig {
    pub fn primary_defaults() -> Self {
        Self {
            api_key: None,
            base_url: PRIMARY_BASE_URL.to_string(),
            model: PRIMARY_MODEL.to_string(),
            max_tokens: PRIMARY_MAX_TOKENS,
            temperature: PRIMARY_TEMPERATURE,
            timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
        }
    }

    pub fn secondary_defaults() -> Self {
        Self {
            api_key: None,
            base_url: SECONDARY_BASE_URL.to_string(),
            model: SECONDARY_MODEL.to_string(),
            max_tokens: SECONDARY_MAX_TOKENS,
            temperature: SECONDARY_TEMPERATURE,
            timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
        }
    }

    /// The credential, if one is set and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.credential().is_some()
    }

    pub fn call_parameters(&self) -> ModelCallParameters {
        ModelCallParameters {
            model_id: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self, kind: TierKind) -> Result<()> {
        let label = kind.label();
        if self.base_url.trim().is_empty() {
            bail!("{label} tier: base_url must not be empty");
        }
        if self.model.trim().is_empty() {
            bail!("{label} tier: model must not be empty");
        }
        if self.max_tokens == 0 {
            bail!("{label} tier: max_tokens must be greater than 0");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            bail!(
                "{label} tier: temperature must be between 0.0 and 2.0 (got {})",
                self.temperature
            );
        }
        if self.timeout_secs == 0 {
            bail!("{label} tier: timeout_secs must be greater than 0");
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000")
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_HTTP_ADDR.to_string(),
        }
    }
}

/// Feature flags configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Enable debug logging for troubleshooting
    #[serde(default)]
    pub debug_logging: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub primary: TierConfig,
    pub secondary: TierConfig,
    pub features: FeaturesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            primary: TierConfig::primary_defaults(),
            secondary: TierConfig::secondary_defaults(),
            features: FeaturesConfig::default(),
        }
    }
}

impl Config {
    pub fn tier(&self, kind: TierKind) -> &TierConfig {
        match kind {
            TierKind::Primary => &self.primary,
            TierKind::Secondary => &self.secondary,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.bind_address.trim().is_empty() {
            bail!("server.bind_address must not be empty");
        }
        self.primary.validate(TierKind::Primary)?;
        self.secondary.validate(TierKind::Secondary)?;
        Ok(())
    }
}
