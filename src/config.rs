//! Service configuration
//!
//! Loaded from `EXPENSE_BOT_*` environment variables into an immutable
//! snapshot. Handlers read the current snapshot through [`ConfigHandle`]
//! without locking; a reload swaps in a whole new snapshot.

use arc_swap::ArcSwap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

const ENV_SERVER_URL: &str = "EXPENSE_BOT_SERVER_URL";
const ENV_SITE_URL: &str = "EXPENSE_BOT_SITE_URL";
const ENV_TOKEN: &str = "EXPENSE_BOT_TOKEN";
const ENV_USER_ID: &str = "EXPENSE_BOT_USER_ID";
const ENV_CHANNEL_ID: &str = "EXPENSE_BOT_CHANNEL_ID";
const ENV_PLUGIN_ID: &str = "EXPENSE_BOT_PLUGIN_ID";
const ENV_WEBHOOK_TOKEN: &str = "EXPENSE_BOT_WEBHOOK_TOKEN";
const ENV_DB_PATH: &str = "EXPENSE_BOT_DB_PATH";
const ENV_PORT: &str = "EXPENSE_BOT_PORT";

pub const DEFAULT_PLUGIN_ID: &str = "com.mattermost.plugin-expense-bot";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the chat server REST API
    pub server_url: String,
    /// Public base URL used in file links; defaults to `server_url`
    pub site_url: String,
    pub token: String,
    /// Identity the bot posts as
    pub bot_user_id: String,
    /// Shared channel where claims are announced for approval
    pub channel_id: String,
    pub plugin_id: String,
    /// Bearer token for the inbound event webhook; `None` rejects every call
    pub webhook_token: Option<String>,
    pub db_path: PathBuf,
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_url", &self.server_url)
            .field("site_url", &self.site_url)
            .field("token", &"[redacted]")
            .field("bot_user_id", &self.bot_user_id)
            .field("channel_id", &self.channel_id)
            .field("plugin_id", &self.plugin_id)
            .field(
                "webhook_token",
                &self.webhook_token.as_ref().map(|_| "[redacted]"),
            )
            .field("db_path", &self.db_path)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing(var));

        let server_url = require(ENV_SERVER_URL)?.trim_end_matches('/').to_string();
        let site_url = get(ENV_SITE_URL)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| server_url.clone());

        let db_path = get(ENV_DB_PATH).map_or_else(
            || {
                let home = get("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.expense-bot/expense-bot.db"))
            },
            PathBuf::from,
        );

        let port = match get(ENV_PORT) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: ENV_PORT,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            server_url,
            site_url,
            token: require(ENV_TOKEN)?,
            bot_user_id: require(ENV_USER_ID)?,
            channel_id: require(ENV_CHANNEL_ID)?,
            plugin_id: get(ENV_PLUGIN_ID).unwrap_or_else(|| DEFAULT_PLUGIN_ID.to_string()),
            webhook_token: get(ENV_WEBHOOK_TOKEN),
            db_path,
            port,
        })
    }

    /// Path the approval buttons post back to, relative to the chat server
    pub fn callback_url(&self, expense_id: &str, state: &str) -> String {
        format!(
            "/plugins/{}/api/expenses/{expense_id}/{state}",
            self.plugin_id
        )
    }
}

/// Shared, atomically replaceable configuration snapshot
#[derive(Clone)]
pub struct ConfigHandle(Arc<ArcSwap<Config>>);

impl ConfigHandle {
    pub fn new(config: Config) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(config)))
    }

    /// Current snapshot; stays valid even if a reload happens meanwhile
    pub fn snapshot(&self) -> Arc<Config> {
        self.0.load_full()
    }

    pub fn replace(&self, config: Config) {
        self.0.store(Arc::new(config));
    }

    /// Re-read the environment; on failure the current snapshot stays
    pub fn reload_from_env(&self) -> Result<(), ConfigError> {
        let config = Config::from_env()?;
        let current = self.snapshot();
        if config.db_path != current.db_path || config.port != current.port {
            tracing::warn!("Database path and port changes take effect after restart");
        }
        tracing::info!(?config, "Configuration reloaded");
        self.replace(config);
        Ok(())
    }
}

impl fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConfigHandle").field(&self.snapshot()).finish()
    }
}
