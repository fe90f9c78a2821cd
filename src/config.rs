use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::aggregator::DEFAULT_BATCH_SIZE;
use crate::github::DEFAULT_API_BASE;
use crate::selector::{IgnoreRules, DEFAULT_IGNORE_EXTENSIONS};

pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    #[serde(default = "default_ignore_extensions")]
    pub ignore_extensions: Vec<String>,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_tokenizer_type")]
    pub default_tokenizer: String,

    #[serde(default = "default_tokenizer_model")]
    pub default_tokenizer_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            github_token: None,
            ignore_extensions: default_ignore_extensions(),
            batch_size: default_batch_size(),
            api_base_url: default_api_base_url(),
            default_tokenizer: default_tokenizer_type(),
            default_tokenizer_model: default_tokenizer_model(),
        }
    }
}

/// What the core needs from the settings layer.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credential: Option<String>,
    pub ignore_rules: IgnoreRules,
}

impl Config {
    /// Resolves the settings, preferring `token_override`, then `$GITHUB_TOKEN`,
    /// then the configured token.
    pub fn settings(&self, token_override: Option<String>, extra_ignores: &[String]) -> Settings {
        let credential = token_override
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .or_else(|| self.github_token.clone())
            .filter(|token| !token.trim().is_empty());

        let mut ignore_rules = IgnoreRules::new(&self.ignore_extensions);
        ignore_rules.extend(extra_ignores);

        Settings {
            credential,
            ignore_rules,
        }
    }
}

fn default_ignore_extensions() -> Vec<String> {
    DEFAULT_IGNORE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_tokenizer_type() -> String {
    "estimate".to_string()
}

fn default_tokenizer_model() -> String {
    "gpt-4o".to_string()
}

pub fn load_config() -> anyhow::Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        let config = Config::default();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let config_str = toml::to_string_pretty(&config)?;
        std::fs::write(&config_path, config_str)?;
        return Ok(config);
    }

    let config_str = std::fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("gitmerge");
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: Config = toml::from_str("batch_size = 3\n").unwrap();
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert!(config.ignore_extensions.contains(&"-lock.json".to_string()));
        assert_eq!(config.github_token, None);
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(!text.contains("github_token"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.ignore_extensions, config.ignore_extensions);
        assert_eq!(parsed.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_settings_prefers_override_and_merges_ignores() {
        let config = Config {
            github_token: Some("from-file".to_string()),
            ignore_extensions: vec![".png".to_string()],
            ..Config::default()
        };

        let settings = config.settings(Some("from-flag".to_string()), &[".md".to_string()]);
        assert_eq!(settings.credential.as_deref(), Some("from-flag"));
        assert!(settings.ignore_rules.is_ignored_extension(".PNG"));
        assert!(settings.ignore_rules.is_ignored_extension(".md"));
        assert!(!settings.ignore_rules.is_ignored_extension(".rs"));
    }
}
