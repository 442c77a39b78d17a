//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;
use crate::application::services::greeter::DEFAULT_WELCOME_TEXT;
use crate::application::services::intent_dispatcher::DEFAULT_SIGN_IN_URL;
use crate::infrastructure::identity::{github, graph, DEFAULT_USER_AGENT};

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub identity: IdentityConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub welcome_text: String,
    /// When false only the greeter runs
    pub intents: bool,
    pub sign_in_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct IdentityConfig {
    pub github_api_base: String,
    pub graph_api_base: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub user_id: String,
    pub channel_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "intent-bot".to_string(),
                welcome_text: DEFAULT_WELCOME_TEXT.to_string(),
                intents: true,
                sign_in_url: DEFAULT_SIGN_IN_URL.to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                path: Some(PathBuf::from("intent-bot.db")),
            },
            identity: IdentityConfig {
                github_api_base: github::API_BASE.to_string(),
                graph_api_base: graph::API_BASE.to_string(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
                timeout_seconds: 10,
            },
            adapters: AdaptersConfig {
                console: Some(ConsoleConfig {
                    enabled: true,
                    user_id: "console-user".to_string(),
                    channel_id: "console".to_string(),
                }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(name) = std::env::var("BOT_NAME") {
            config.bot.name = name;
        }

        if let Ok(text) = std::env::var("BOT_WELCOME_TEXT") {
            config.bot.welcome_text = text;
        }

        if let Ok(backend) = std::env::var("STORAGE_BACKEND") {
            match backend.to_lowercase().as_str() {
                "memory" => config.storage.backend = StorageBackend::Memory,
                "sqlite" => config.storage.backend = StorageBackend::Sqlite,
                other => tracing::warn!("Unknown STORAGE_BACKEND {:?}, keeping {:?}", other, config.storage.backend),
            }
        }

        if let Ok(path) = std::env::var("STORAGE_PATH") {
            config.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(base) = std::env::var("GITHUB_API_BASE") {
            config.identity.github_api_base = base;
        }

        if let Ok(base) = std::env::var("GRAPH_API_BASE") {
            config.identity.graph_api_base = base;
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::Sqlite && self.storage.path.is_none() {
            return Err(ConfigError::MissingField("storage.path".to_string()));
        }
        if self.identity.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue("identity.timeout-seconds must be positive".to_string()));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.identity.timeout_seconds)
    }

    /// Console settings, falling back to defaults when the section is missing
    pub fn console(&self) -> ConsoleConfig {
        self.adapters
            .console
            .clone()
            .unwrap_or_else(|| ConsoleConfig {
                enabled: true,
                user_id: "console-user".to_string(),
                channel_id: "console".to_string(),
            })
    }
}
