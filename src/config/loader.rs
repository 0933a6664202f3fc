// Configuration loader
// Defaults, then ~/.copyforge/config.toml (or an explicit path), then environment

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::{Config, TierConfig};

/// Environment variable names, in lookup order per setting.
pub const PRIMARY_KEY_VARS: &[&str] = &["COPYFORGE_PRIMARY_API_KEY", "OPENAI_API_KEY"];
pub const SECONDARY_KEY_VARS: &[&str] = &["COPYFORGE_SECONDARY_API_KEY", "GROQ_API_KEY"];
pub const BIND_VAR: &str = "COPYFORGE_BIND";
pub const DEBUG_VAR: &str = "COPYFORGE_DEBUG";

/// Load configuration from the process environment and config file.
///
/// An explicit `path` must exist. Without one, `~/.copyforge/config.toml` is
/// read when present and silently skipped otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    let file = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Configuration file not found: {}", p.display());
            }
            Some(p.to_path_buf())
        }
        None => default_config_path().filter(|p| p.exists()),
    };

    if let Some(file) = file {
        tracing::debug!("Loading configuration from {}", file.display());
        apply_file(&mut config, &file)?;
    }

    apply_env(&mut config, env);

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// `~/.copyforge/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".copyforge").join("config.toml"))
}

// Every field optional so a file can override just one value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    debug_logging: Option<bool>,
    #[serde(default)]
    server: Option<TomlServer>,
    #[serde(default)]
    primary: Option<TomlTier>,
    #[serde(default)]
    secondary: Option<TomlTier>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlServer {
    bind_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTier {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

impl TomlTier {
    fn apply(self, tier: &mut TierConfig) {
        if let Some(v) = self.api_key {
            tier.api_key = Some(v);
        }
        if let Some(v) = self.base_url {
            tier.base_url = v;
        }
        if let Some(v) = self.model {
            tier.model = v;
        }
        if let Some(v) = self.max_tokens {
            tier.max_tokens = v;
        }
        if let Some(v) = self.temperature {
            tier.temperature = v;
        }
        if let Some(v) = self.timeout_secs {
            tier.timeout_secs = v;
        }
    }
}

fn apply_file(config: &mut Config, path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let toml_config: TomlConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;

    if let Some(debug) = toml_config.debug_logging {
        config.features.debug_logging = debug;
    }
    if let Some(bind) = toml_config.server.and_then(|s| s.bind_address) {
        config.server.bind_address = bind;
    }
    if let Some(primary) = toml_config.primary {
        primary.apply(&mut config.primary);
    }
    if let Some(secondary) = toml_config.secondary {
        secondary.apply(&mut config.secondary);
    }
    Ok(())
}

fn apply_env<F>(config: &mut Config, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let first_non_empty = |vars: &[&str]| {
        vars.iter()
            .filter_map(|v| env(*v))
            .find(|value| !value.trim().is_empty())
    };

    if let Some(key) = first_non_empty(PRIMARY_KEY_VARS) {
        config.primary.api_key = Some(key);
    }
    if let Some(key) = first_non_empty(SECONDARY_KEY_VARS) {
        config.secondary.api_key = Some(key);
    }
    if let Some(bind) = first_non_empty(&[BIND_VAR]) {
        config.server.bind_address = bind;
    }
    if let Some(debug) = env(DEBUG_VAR) {
        config.features.debug_logging = parse_flag(&debug);
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
