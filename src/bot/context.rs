//! Shared dependencies injected into every handler

use sqlx::SqlitePool;
use std::sync::Arc;
use teloxide::types::ChatId;

use crate::config::{AdminSet, BotConfig};
use crate::localization::pick_language;
use crate::session::{EvictionPolicy, SessionStore};

#[derive(Clone)]
pub struct AppContext {
    pub pool: SqlitePool,
    pub sessions: Arc<SessionStore>,
    pub admins: Arc<AdminSet>,
    pub default_language: Arc<str>,
}

impl AppContext {
    pub fn new(
        pool: SqlitePool,
        admins: AdminSet,
        sessions: SessionStore,
        default_language: &str,
    ) -> Self {
        Self {
            pool,
            sessions: Arc::new(sessions),
            admins: Arc::new(admins),
            default_language: Arc::from(default_language),
        }
    }

    pub fn from_config(pool: SqlitePool, config: &BotConfig) -> Self {
        Self::new(
            pool,
            config.admins.clone(),
            SessionStore::new(EvictionPolicy::from_timeout(config.session_idle_timeout)),
            &config.default_language,
        )
    }

    pub fn is_admin(&self, chat_id: ChatId) -> bool {
        self.admins.contains(chat_id)
    }

    /// Language for replies to a user with the given Telegram language code
    pub fn language(&self, user_language: Option<&str>) -> String {
        pick_language(user_language, &self.default_language).to_string()
    }
}
