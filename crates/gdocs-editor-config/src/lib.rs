use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://docs.googleapis.com/v1";
pub const DEFAULT_ACCESS_TOKEN_ENV: &str = "GDOCS_ACCESS_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read access token file at {token_path}: {source}")]
    TokenReadError {
        token_path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// REST base of the document service.
    pub api_base_url: String,
    /// Environment variable holding the OAuth bearer token.
    pub access_token_env: String,
    /// File holding the bearer token; takes precedence over the env var.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token_env: DEFAULT_ACCESS_TOKEN_ENV.to_string(),
            access_token_file: None,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the token file path
        config.access_token_file = config
            .access_token_file
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/gdocs-editor");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Bearer token from `access_token_file`, else from `access_token_env`.
    ///
    /// Surrounding whitespace is trimmed; an empty token counts as absent.
    pub fn resolve_access_token(&self) -> Result<Option<String>, ConfigError> {
        let token = match &self.access_token_file {
            Some(token_path) => Some(std::fs::read_to_string(token_path).map_err(|source| {
                ConfigError::TokenReadError {
                    token_path: token_path.clone(),
                    source,
                }
            })?),
            None => std::env::var(&self.access_token_env).ok(),
        };

        Ok(token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty()))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
