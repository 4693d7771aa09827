// assure-core/src/infrastructure/config/client.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::infrastructure::error::InfrastructureError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TOKEN_FILE: &str = ".assure-token";

// --- CONFIGURATION STRUCTS ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct ClientConfig {
    #[validate(nested)]
    pub api: ApiConfig,
    #[validate(nested)]
    pub polling: PollingConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    #[validate(url(message = "api.base_url must be an absolute URL"))]
    pub base_url: String,
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PollingConfig {
    /// 0 disables the deadline.
    #[validate(range(max = 86_400))]
    pub max_duration_secs: u64,
    #[validate(range(min = 1, max = 10_000))]
    pub total_questions: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: 30 * 60,
            total_questions: 107,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Relative paths resolve against the directory the config was looked up in.
    pub token_path: Option<PathBuf>,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn max_poll_duration(&self) -> Option<Duration> {
        match self.polling.max_duration_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn token_path(&self, root: &Path) -> PathBuf {
        let path = self
            .session
            .token_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE));
        if path.is_absolute() { path } else { root.join(path) }
    }
}

// --- LOADER ---

/// Reads `assure.yaml` (or `.assure.yaml`, or `explicit`), then applies `ASSURE_*`
/// environment overrides and validates the result.
pub fn load_client_config(
    root: &Path,
    explicit: Option<&Path>,
) -> Result<ClientConfig, InfrastructureError> {
    load_client_config_with(root, explicit, |key| std::env::var(key).ok())
}

/// Same as [`load_client_config`] with an injectable environment lookup.
#[instrument(skip(lookup))]
pub fn load_client_config_with(
    root: &Path,
    explicit: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, InfrastructureError> {
    // 1. Découverte du fichier
    let mut config = match find_config(root, explicit)? {
        Some(path) => {
            info!(path = ?path, "Loading client configuration");
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                ClientConfig::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        }
        None => {
            debug!(root = ?root, "No configuration file, using defaults");
            ClientConfig::default()
        }
    };

    // 2. Override via variables d'environnement (layering)
    apply_env_overrides(&mut config, lookup)?;

    // 3. Validation finale
    config.validate()?;
    Ok(config)
}

fn find_config(root: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>, InfrastructureError> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(InfrastructureError::ConfigError(format!(
            "Configuration file {:?} does not exist",
            path
        )));
    }

    let candidates = ["assure.yaml", ".assure.yaml"];
    Ok(candidates
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists()))
}

fn apply_env_overrides(
    config: &mut ClientConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), InfrastructureError> {
    if let Some(val) = lookup("ASSURE_API_URL") {
        info!(old = %config.api.base_url, new = %val, "Overriding API URL via ENV");
        config.api.base_url = val;
    }
    if let Some(val) = lookup("ASSURE_TIMEOUT_SECS") {
        config.api.timeout_secs = parse_env("ASSURE_TIMEOUT_SECS", &val)?;
    }
    if let Some(val) = lookup("ASSURE_MAX_POLL_SECS") {
        config.polling.max_duration_secs = parse_env("ASSURE_MAX_POLL_SECS", &val)?;
    }
    if let Some(val) = lookup("ASSURE_TOKEN_PATH") {
        config.session.token_path = Some(PathBuf::from(val));
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, InfrastructureError> {
    raw.trim()
        .parse()
        .map_err(|_| InfrastructureError::ConfigError(format!("{key}={raw:?} is not a number")))
}
