mod defaults;

#[cfg(test)]
mod tests;

pub use defaults::DEFAULT_API_SERVER;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::CourierError;
use defaults::*;

/// Environment variable consulted when `bot.token` is empty.
pub const TOKEN_ENV: &str = "COURIER_BOT_TOKEN";

/// Top-level courier configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Bot identity and API endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub token: String,
    /// Base URL of the Bot API server. Point it at a self-hosted
    /// `telegram-bot-api` instance to bypass the cloud limits.
    #[serde(default = "default_api_server")]
    pub api_server: String,
    /// Timeout for every request except `getUpdates`, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_server: default_api_server(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl BotConfig {
    /// Config for `token` with every other field defaulted.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }
}

/// Long-polling settings for `getUpdates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Maximum updates per batch. The API accepts 1 to 100.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Server-side long-poll wait in seconds.
    #[serde(default = "default_poll_timeout")]
    pub timeout_secs: u32,
    /// Update kinds to receive. Empty = everything except the opt-in kinds.
    #[serde(default)]
    pub allowed_updates: Vec<String>,
    /// Capacity of the queue between the poller and its consumer.
    #[serde(default = "default_buffer")]
    pub buffer: usize,
    /// Pause after a failed fetch, in milliseconds. 0 = retry immediately.
    #[serde(default)]
    pub retry_delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            timeout_secs: default_poll_timeout(),
            allowed_updates: Vec::new(),
            buffer: default_buffer(),
            retry_delay_ms: 0,
        }
    }
}

impl PollingConfig {
    /// Reject settings the API or the poller cannot work with.
    pub fn validate(&self) -> Result<(), CourierError> {
        if !(1..=100).contains(&self.limit) {
            return Err(CourierError::Config(format!(
                "polling.limit must be between 1 and 100, got {}",
                self.limit
            )));
        }
        if self.buffer == 0 {
            return Err(CourierError::Config(
                "polling.buffer must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for a daily rolling log file. Empty = stderr only.
    #[serde(default)]
    pub dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: String::new(),
        }
    }
}

impl Config {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), CourierError> {
        if self.bot.api_server.trim().is_empty() {
            return Err(CourierError::Config("bot.api_server is empty".into()));
        }
        self.polling.validate()
    }

    /// Fill `bot.token` from `value` when the file left it empty.
    fn apply_token_fallback(&mut self, value: Option<String>) {
        if self.bot.token.is_empty() {
            if let Some(token) = value.filter(|t| !t.is_empty()) {
                self.bot.token = token;
            }
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. An empty `bot.token`
/// is taken from `COURIER_BOT_TOKEN`.
pub fn load(path: &str) -> Result<Config, CourierError> {
    let mut config = read(Path::new(path))?;
    config.apply_token_fallback(std::env::var(TOKEN_ENV).ok());
    config.validate()?;
    Ok(config)
}

fn read(path: &Path) -> Result<Config, CourierError> {
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| CourierError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    parse(&content)
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, CourierError> {
    toml::from_str(content).map_err(|e| CourierError::Config(format!("failed to parse config: {}", e)))
}
