use crate::domain::ConditionScoreSet;
use crate::services::ai::{ChatTurn, TextGenerator};
use crate::services::report::AnalysisReport;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Everything one client has seen and done: current data, the last analysis,
/// and the support chat.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSession {
    pub id: Uuid,
    pub model_data: ConditionScoreSet,
    pub report: Option<AnalysisReport>,
    pub analysis_complete: bool,
    pub show_chat: bool,
    pub chat_history: Vec<ChatTurn>,
    #[serde(default)]
    pub chat_epoch: u64,
    #[serde(default)]
    pub show_services: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisSession {
    pub fn new(model_data: ConditionScoreSet) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            model_data,
            report: None,
            analysis_complete: false,
            show_chat: false,
            chat_history: Vec::new(),
            chat_epoch: 0,
            show_services: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn replace_data(&mut self, model_data: ConditionScoreSet) {
        self.model_data = model_data;
        self.touch();
    }

    pub fn complete_analysis(&mut self, report: AnalysisReport) {
        self.report = Some(report);
        self.analysis_complete = true;
        self.touch();
    }

    pub fn start_chat(&mut self) {
        self.show_chat = true;
        self.chat_history.clear();
        self.chat_epoch += 1;
        self.touch();
    }

    /// Appends a user turn and returns the position its reply must land at.
    pub fn push_user_turn(&mut self, message: String) -> ChatTicket {
        self.chat_history.push(ChatTurn::user(message));
        self.touch();
        ChatTicket {
            epoch: self.chat_epoch,
            history_len: self.chat_history.len(),
        }
    }

    /// Appends the reply only if the chat was neither restarted nor extended
    /// since `ticket` was taken.
    pub fn push_reply(&mut self, ticket: ChatTicket, reply: String) -> bool {
        if ticket.epoch != self.chat_epoch || ticket.history_len != self.chat_history.len() {
            return false;
        }
        self.chat_history.push(ChatTurn::assistant(reply));
        self.touch();
        true
    }

    pub fn show_services(&mut self) {
        self.show_services = true;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChatTicket {
    epoch: u64,
    history_len: usize,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, AnalysisSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: AnalysisSession) {
        self.sessions.write().await.insert(session.id, session);
    }

    pub async fn get(&self, id: Uuid) -> Option<AnalysisSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Applies `f` under the write lock and returns the updated session.
    pub async fn update<F, T>(&self, id: Uuid, f: F) -> Option<(AnalysisSession, T)>
    where
        F: FnOnce(&mut AnalysisSession) -> T,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        let out = f(session);
        Some((session.clone(), out))
    }

    /// Drops sessions not updated within `ttl`; returns how many went.
    pub async fn remove_idle(&self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.updated_at < ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<dyn TextGenerator>,
    pub sessions: SessionStore,
    pub session_ttl: Duration,
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_returns_snapshot() {
        let store = SessionStore::new();
        let session = AnalysisSession::new(ConditionScoreSet::from_shares([90, 10, 0, 0, 0]));
        let id = session.id;
        store.insert(session).await;

        let (updated, was_open) = store
            .update(id, |s| {
                let was_open = s.show_chat;
                s.start_chat();
                was_open
            })
            .await
            .unwrap();
        assert!(!was_open);
        assert!(updated.show_chat);
        assert!(store.get(id).await.unwrap().show_chat);
        assert!(store.update(Uuid::new_v4(), |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_idle_keeps_recent_sessions() {
        let store = SessionStore::new();
        let mut stale = AnalysisSession::new(ConditionScoreSet::from_shares([100, 0, 0, 0, 0]));
        stale.updated_at = Utc::now() - Duration::hours(5);
        let fresh = AnalysisSession::new(ConditionScoreSet::from_shares([100, 0, 0, 0, 0]));
        let fresh_id = fresh.id;
        store.insert(stale).await;
        store.insert(fresh).await;

        let removed = store.remove_idle(Duration::hours(2), Utc::now()).await;
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get(fresh_id).await.is_some());
    }

    #[test]
    fn test_session_state_round_trips_through_json() {
        let mut session = AnalysisSession::new(ConditionScoreSet::from_shares([60, 40, 0, 0, 0]));
        session.start_chat();
        session.chat_history.push(ChatTurn::user("hello"));

        let json = serde_json::to_string(&session).unwrap();
        let restored: AnalysisSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_reply_lands_after_its_user_turn() {
        let mut session = AnalysisSession::new(ConditionScoreSet::default());
        session.start_chat();
        let ticket = session.push_user_turn("hello".to_string());
        assert!(session.push_reply(ticket, "hi".to_string()));
        assert_eq!(session.chat_history.len(), 2);
    }

    #[test]
    fn test_reply_dropped_after_chat_restart() {
        let mut session = AnalysisSession::new(ConditionScoreSet::default());
        session.start_chat();
        let ticket = session.push_user_turn("hello".to_string());
        session.start_chat();

        assert!(!session.push_reply(ticket, "late reply".to_string()));
        assert!(session.chat_history.is_empty());
    }

    #[test]
    fn test_reply_dropped_when_another_message_arrived() {
        let mut session = AnalysisSession::new(ConditionScoreSet::default());
        session.start_chat();
        let first = session.push_user_turn("one".to_string());
        let second = session.push_user_turn("two".to_string());

        assert!(!session.push_reply(first, "reply to one".to_string()));
        assert!(session.push_reply(second, "reply to two".to_string()));
        let contents: Vec<&str> = session.chat_history.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "reply to two"]);
    }

    #[test]
    fn test_start_chat_clears_history() {
        let mut session = AnalysisSession::new(ConditionScoreSet::default());
        session.chat_history.push(ChatTurn::user("old"));
        session.start_chat();
        assert!(session.show_chat);
        assert!(session.chat_history.is_empty());
    }
}
