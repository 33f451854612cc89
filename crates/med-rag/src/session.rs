//! Per-session conversation memory

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;

use crate::config::SessionConfig;

struct SessionState {
    exchanges: VecDeque<(String, String)>,
    last_active: DateTime<Utc>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            exchanges: VecDeque::new(),
            last_active: Utc::now(),
        }
    }
}

/// Sliding-window conversation memory keyed by session id.
///
/// Each session keeps its most recent exchanges, FIFO at the window size.
/// Idle sessions expire after the TTL, and when the session count hits its
/// cap the least recently active session is evicted first.
pub struct SessionManager {
    sessions: DashMap<String, SessionState>,
    window_size: usize,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            window_size: config.window_size,
            ttl: Duration::seconds(config.ttl_secs as i64),
            max_sessions: config.max_sessions,
        }
    }

    /// Exchanges for a session, oldest first. An expired session reads as
    /// empty and is dropped on access.
    pub fn history(&self, session_id: &str) -> Vec<(String, String)> {
        let expired = match self.sessions.get(session_id) {
            Some(state) => {
                if !self.is_expired(&state) {
                    return state.exchanges.iter().cloned().collect();
                }
                true
            }
            None => return Vec::new(),
        };

        if expired {
            self.sessions.remove(session_id);
        }
        Vec::new()
    }

    /// Record one question/answer exchange. The append and the window trim
    /// happen under the same entry lock, so concurrent appends to one
    /// session cannot interleave.
    pub fn append(&self, session_id: &str, question: &str, answer: &str) {
        self.make_room_for(session_id);

        let mut state = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionState::new);

        state
            .exchanges
            .push_back((question.to_string(), answer.to_string()));
        while state.exchanges.len() > self.window_size {
            state.exchanges.pop_front();
        }
        state.last_active = Utc::now();
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn is_expired(&self, state: &SessionState) -> bool {
        Utc::now().signed_duration_since(state.last_active) >= self.ttl
    }

    /// Purge expired sessions, then evict the least recently active until
    /// a new session fits under the cap. Must not be called while holding
    /// an entry lock on the same map.
    fn make_room_for(&self, session_id: &str) {
        if self.sessions.contains_key(session_id) {
            return;
        }

        let ttl = self.ttl;
        let now = Utc::now();
        self.sessions
            .retain(|_, state| now.signed_duration_since(state.last_active) < ttl);

        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().last_active)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(key) => {
                    tracing::debug!("Evicting idle session '{}'", key);
                    self.sessions.remove(&key);
                }
                None => break,
            }
        }
    }
}
