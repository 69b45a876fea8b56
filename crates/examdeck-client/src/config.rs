//! Client configuration.
//!
//! Note: the custom Debug impl masks the API token to prevent accidental
//! exposure in logs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the remote learning service client.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the service API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for authenticated endpoints.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Directory for saved submissions and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./examdeck-results")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            timeout_secs: default_timeout(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examdeck.toml` in the current directory
/// 2. `~/.config/examdeck/config.toml`
///
/// Environment variable overrides: `EXAMDECK_BASE_URL`, `EXAMDECK_API_TOKEN`.
pub fn load_config() -> Result<ClientConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examdeck.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ClientConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ClientConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("EXAMDECK_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(token) = std::env::var("EXAMDECK_API_TOKEN") {
        config.api_token = Some(token);
    }

    // Resolve env vars in string fields
    config.base_url = resolve_env_vars(&config.base_url);
    config.api_token = config.api_token.as_deref().map(resolve_env_vars);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examdeck"))
}
