//! Per-client tutoring sessions.
//!
//! [`SessionStore`] keeps, for every session id, the conversation blocks posted
//! to `/api/body` and the learner profile posted to `/api/init`. Sessions are
//! created on first use and live for the lifetime of the process.

use dashmap::DashMap;

use tutor_core::catalog::LearnerProfile;
use tutor_core::{Block, BlockId, Conversation};

/// State of one client session.
#[derive(Debug, Clone, Default)]
pub struct TutorSession {
    pub conversation: Conversation,
    pub profile: Option<LearnerProfile>,
}

/// Registry of tutoring sessions.
///
/// Backed by `DashMap` so concurrent requests for different sessions do not
/// contend.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, TutorSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `block` under `id` and returns the session's blocks in order.
    pub fn record_block(&self, session: &str, id: BlockId, block: Block) -> Vec<Block> {
        let mut entry = self.sessions.entry(session.to_string()).or_default();
        entry.conversation.upsert(id, block);
        entry.conversation.ordered()
    }

    /// Replaces the learner profile of `session`.
    pub fn set_profile(&self, session: &str, profile: LearnerProfile) {
        self.sessions
            .entry(session.to_string())
            .or_default()
            .profile = Some(profile);
    }

    pub fn profile(&self, session: &str) -> Option<LearnerProfile> {
        self.sessions
            .get(session)
            .and_then(|entry| entry.profile.clone())
    }

    /// Number of blocks stored for `session`.
    pub fn block_count(&self, session: &str) -> usize {
        self.sessions
            .get(session)
            .map(|entry| entry.conversation.len())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_scoped_per_session() {
        let store = SessionStore::new();
        store.record_block("a", BlockId::Number(2), Block::cours("second"));
        let blocks = store.record_block("a", BlockId::Number(1), Block::cours("first"));
        assert_eq!(blocks, vec![Block::cours("first"), Block::cours("second")]);

        let other = store.record_block("b", BlockId::Number(1), Block::cours("alone"));
        assert_eq!(other.len(), 1);
        assert_eq!(store.block_count("a"), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn same_id_replaces_block() {
        let store = SessionStore::new();
        store.record_block("s", BlockId::Text("intro".into()), Block::cours("old"));
        let blocks = store.record_block("s", BlockId::Text("intro".into()), Block::cours("new"));
        assert_eq!(blocks, vec![Block::cours("new")]);
    }

    #[test]
    fn profile_round_trips() {
        let store = SessionStore::new();
        assert!(store.profile("s").is_none());
        let profile = LearnerProfile {
            name: "Sam".into(),
            ..LearnerProfile::default()
        };
        store.set_profile("s", profile.clone());
        assert_eq!(store.profile("s"), Some(profile));
        assert_eq!(store.block_count("s"), 0);
    }
}
