//! In-process session State Store (spec §5): the index of live sessions is
//! guarded by a `std::sync::RwLock` for cheap concurrent lookups, while each
//! session's mutable state is behind its own `tokio::sync::Mutex` so one
//! learner's in-flight turn never blocks another session's traffic.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use tutor_core::{SessionState, TurnRecord};
use tutor_types::error::{TutorError, TutorResult};

/// Turn history kept alongside the live state for `export_session` (spec
/// §6). `SessionState` itself only carries the current snapshot, not the
/// append-only `TurnRecord` log, so the store keeps both.
#[derive(Default)]
pub struct StateStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
    turn_logs: RwLock<HashMap<String, Arc<Mutex<Vec<TurnRecord>>>>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self { sessions: RwLock::new(HashMap::new()), turn_logs: RwLock::new(HashMap::new()) }
    }

    /// Create a new session and register it in the index. Returns the new
    /// session id.
    pub fn create_session(&self, domain: impl Into<String>, design_brief: impl Into<String>) -> TutorResult<String> {
        let state = SessionState::new(domain, design_brief);
        let session_id = state.session_id.clone();
        let mut index = self.sessions.write().map_err(|_| TutorError::Lock("session index poisoned".to_string()))?;
        index.insert(session_id.clone(), Arc::new(Mutex::new(state)));
        let mut logs = self.turn_logs.write().map_err(|_| TutorError::Lock("turn log index poisoned".to_string()))?;
        logs.insert(session_id.clone(), Arc::new(Mutex::new(Vec::new())));
        Ok(session_id)
    }

    /// Append a committed `TurnRecord` to a session's export log (spec §6).
    pub async fn append_turn_record(&self, session_id: &str, record: TurnRecord) -> TutorResult<()> {
        let handle = {
            let logs = self.turn_logs.read().map_err(|_| TutorError::Lock("turn log index poisoned".to_string()))?;
            logs.get(session_id).cloned().ok_or_else(|| TutorError::NotFound(format!("session {session_id}")))?
        };
        handle.lock().await.push(record);
        Ok(())
    }

    pub async fn turn_records(&self, session_id: &str) -> TutorResult<Vec<TurnRecord>> {
        let handle = {
            let logs = self.turn_logs.read().map_err(|_| TutorError::Lock("turn log index poisoned".to_string()))?;
            logs.get(session_id).cloned().ok_or_else(|| TutorError::NotFound(format!("session {session_id}")))?
        };
        let records = handle.lock().await.clone();
        Ok(records)
    }

    /// Look up the handle for a session without holding it locked. Cloning
    /// the `Arc` is the whole point: the index lock is released immediately,
    /// the per-session mutex is acquired separately by the caller.
    pub fn handle(&self, session_id: &str) -> TutorResult<Arc<Mutex<SessionState>>> {
        let index = self.sessions.read().map_err(|_| TutorError::Lock("session index poisoned".to_string()))?;
        index.get(session_id).cloned().ok_or_else(|| TutorError::NotFound(format!("session {session_id}")))
    }

    pub fn remove(&self, session_id: &str) -> TutorResult<()> {
        let mut index = self.sessions.write().map_err(|_| TutorError::Lock("session index poisoned".to_string()))?;
        index.remove(session_id);
        let mut logs = self.turn_logs.write().map_err(|_| TutorError::Lock("turn log index poisoned".to_string()))?;
        logs.remove(session_id);
        Ok(())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|index| index.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_fetch_roundtrips_state() {
        let store = StateStore::new();
        let session_id = store.create_session("residential", "a small house for a family of four").unwrap();
        let handle = store.handle(&session_id).unwrap();
        let state = handle.lock().await;
        assert_eq!(state.session_id, session_id);
        assert_eq!(state.domain, "residential");
    }

    #[test]
    fn unknown_session_is_not_found() {
        let store = StateStore::new();
        let error = store.handle("missing").unwrap_err();
        assert_eq!(error.kind(), "internal");
    }

    #[tokio::test]
    async fn two_sessions_do_not_share_a_lock() {
        let store = StateStore::new();
        let a = store.create_session("residential", "brief a").unwrap();
        let b = store.create_session("commercial", "brief b").unwrap();
        let handle_a = store.handle(&a).unwrap();
        let _guard_a = handle_a.lock().await;
        // Locking session b must not block on session a's guard.
        let handle_b = store.handle(&b).unwrap();
        let guard_b = tokio::time::timeout(std::time::Duration::from_millis(200), handle_b.lock()).await;
        assert!(guard_b.is_ok());
    }
}
