//! # Configuration Module
//!
//! Runtime settings for the bot, read from the process environment
//! (optionally seeded from a `.env` file).

use std::collections::HashSet;
use std::time::Duration;

use teloxide::types::ChatId;

use crate::errors::ConfigError;

// Environment keys
pub const TOKEN_KEY: &str = "TELEGRAM_BOT_TOKEN";
pub const DATABASE_URL_KEY: &str = "DATABASE_URL";
pub const ADMIN_CHAT_IDS_KEY: &str = "ADMIN_CHAT_IDS";
pub const LANGUAGE_KEY: &str = "BOT_LANGUAGE";
pub const SESSION_IDLE_TIMEOUT_KEY: &str = "SESSION_IDLE_TIMEOUT_SECS";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://products.db";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Set of chat identities allowed to modify the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminSet {
    chats: HashSet<ChatId>,
}

impl AdminSet {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            chats: ids.into_iter().map(ChatId).collect(),
        }
    }

    /// Parse a comma-separated list such as `"329159577, -100200300"`
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut chats = HashSet::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id = part.parse::<i64>().map_err(|_| ConfigError::Invalid {
                key: ADMIN_CHAT_IDS_KEY,
                value: part.to_string(),
            })?;
            chats.insert(ChatId(id));
        }
        Ok(Self { chats })
    }

    pub fn contains(&self, chat_id: ChatId) -> bool {
        self.chats.contains(&chat_id)
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}

/// Bot configuration assembled at startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub database_url: String,
    pub admins: AdminSet,
    /// Language used when the user's Telegram language is not supported
    pub default_language: String,
    /// `None` disables session eviction
    pub session_idle_timeout: Option<Duration>,
}

impl BotConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let telegram_token = non_empty(TOKEN_KEY).ok_or(ConfigError::Missing(TOKEN_KEY))?;

        let database_url =
            non_empty(DATABASE_URL_KEY).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let admins = match non_empty(ADMIN_CHAT_IDS_KEY) {
            Some(raw) => AdminSet::parse(&raw)?,
            None => AdminSet::default(),
        };

        let default_language = non_empty(LANGUAGE_KEY)
            .map(|l| l.trim().to_lowercase())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let timeout_secs = match non_empty(SESSION_IDLE_TIMEOUT_KEY) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: SESSION_IDLE_TIMEOUT_KEY,
                value: raw.clone(),
            })?,
            None => DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
        };
        let session_idle_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(Self {
            telegram_token,
            database_url,
            admins,
            default_language,
            session_idle_timeout,
        })
    }
}
