//! # Session Store Module
//!
//! Per-chat conversation state with optional idle eviction.
//!
//! The store holds at most one [`ConversationState`] per chat. Callers follow a
//! load, transition, store pattern; the teloxide dispatcher processes updates
//! of a single chat sequentially, so two transitions for the same chat never
//! interleave.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use teloxide::types::ChatId;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::dialogue::ConversationState;

/// When idle sessions are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    Never,
    IdleTimeout(Duration),
}

impl EvictionPolicy {
    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or(EvictionPolicy::Never, EvictionPolicy::IdleTimeout)
    }

    fn is_expired(&self, last_seen: Instant, now: Instant) -> bool {
        match self {
            EvictionPolicy::Never => false,
            EvictionPolicy::IdleTimeout(timeout) => {
                now.saturating_duration_since(last_seen) >= *timeout
            }
        }
    }
}

#[derive(Debug)]
struct SessionEntry {
    state: ConversationState,
    last_seen: Instant,
}

/// Mapping from chat identity to conversation state
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<ChatId, SessionEntry>>,
    policy: EvictionPolicy,
}

impl SessionStore {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Current state for a chat. Expired sessions are reported as absent.
    pub async fn get(&self, chat_id: ChatId) -> Option<ConversationState> {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();

        let expired = match sessions.get(&chat_id) {
            Some(entry) => self.policy.is_expired(entry.last_seen, now),
            None => return None,
        };
        if expired {
            sessions.remove(&chat_id);
            return None;
        }

        sessions.get(&chat_id).map(|entry| entry.state.clone())
    }

    /// State for a chat, creating an idle session when none exists.
    ///
    /// The flag is `true` when the session was created by this call.
    pub async fn get_or_create(&self, chat_id: ChatId) -> (ConversationState, bool) {
        if let Some(state) = self.get(chat_id).await {
            return (state, false);
        }

        let mut sessions = self.sessions.lock().await;
        let entry = sessions.entry(chat_id).or_insert_with(|| SessionEntry {
            state: ConversationState::Idle,
            last_seen: Instant::now(),
        });
        (entry.state.clone(), true)
    }

    /// Store the state for a chat and refresh its activity timestamp
    pub async fn update(&self, chat_id: ChatId, state: ConversationState) {
        self.sessions.lock().await.insert(
            chat_id,
            SessionEntry {
                state,
                last_seen: Instant::now(),
            },
        );
    }

    /// Return a chat to the idle phase, discarding any draft
    pub async fn reset(&self, chat_id: ChatId) {
        self.update(chat_id, ConversationState::Idle).await;
    }

    /// Forget a chat entirely
    pub async fn remove(&self, chat_id: ChatId) -> Option<ConversationState> {
        self.sessions
            .lock()
            .await
            .remove(&chat_id)
            .map(|entry| entry.state)
    }

    /// Drop every session idle longer than the policy allows. Returns the number removed.
    pub async fn evict_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.policy.is_expired(entry.last_seen, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

/// Periodically evict idle sessions for as long as the process runs
pub fn spawn_sweeper(store: Arc<SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(Instant::now()).await;
            if evicted > 0 {
                let remaining = store.len().await;
                info!(evicted, remaining, "Evicted idle sessions");
            }
        }
    })
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(EvictionPolicy::Never)
    }
}
