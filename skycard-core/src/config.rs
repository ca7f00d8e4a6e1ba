use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{genai::DEFAULT_MODEL, provider::ProviderId};

/// Credentials and options for a single upstream service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Model name, only meaningful for the generative-text provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    ///
    /// [providers.gemini]
    /// api_key = "..."
    /// model = "gemini-1.5-flash"
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Load config from disk, or return an empty default if it doesn't exist
    /// yet. Environment overrides are applied on top.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycard", "skycard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// `OPENWEATHER_API_KEY`, `GEMINI_API_KEY` and `GEMINI_MODEL` win over
    /// the file. Empty values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("OPENWEATHER_API_KEY") {
            self.upsert_provider_api_key(ProviderId::OpenWeather, key);
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.upsert_provider_api_key(ProviderId::Gemini, key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.providers
                .entry(ProviderId::Gemini.as_str().to_string())
                .or_default()
                .model = Some(model);
        }
    }

    /// Set or replace a provider API key, keeping any other options.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .or_default()
            .api_key = api_key;
    }

    /// Returns API key for a provider, if present and non-empty.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id)
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.is_empty())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        self.provider_api_key(ProviderId::Gemini)
    }

    pub fn gemini_model(&self) -> &str {
        self.provider_config(ProviderId::Gemini)
            .and_then(|cfg| cfg.model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
    }
}
