//! Per-chat conversation state.
//!
//! A session holds whatever flow a chat is in the middle of. The dispatcher
//! takes the flow out while handling an update and puts it back afterwards,
//! so each chat is handled by at most one task at a time. Idle sessions are
//! dropped both lazily on access and by a periodic sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

struct Entry<F> {
    flow: F,
    last_activity: Instant,
}

pub struct SessionStore<F> {
    inner: Mutex<HashMap<i64, Entry<F>>>,
    idle_timeout: Duration,
}

impl<F> SessionStore<F> {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Starts a session for a chat, replacing any previous one.
    pub async fn begin(&self, chat_id: i64, flow: F) {
        let mut inner = self.inner.lock().await;
        inner.insert(
            chat_id,
            Entry {
                flow,
                last_activity: Instant::now(),
            },
        );
    }

    /// Removes and returns the chat's flow, if it has one that is still live.
    ///
    /// A stale entry is dropped here rather than returned, so a user coming
    /// back hours later starts over instead of resuming mid-form.
    pub async fn take(&self, chat_id: i64) -> Option<F> {
        let mut inner = self.inner.lock().await;
        let entry = inner.remove(&chat_id)?;
        if entry.last_activity.elapsed() > self.idle_timeout {
            tracing::debug!(chat_id, "dropping idle session");
            return None;
        }
        Some(entry.flow)
    }

    /// Puts a flow back after handling an update, with a fresh activity mark.
    pub async fn resume(&self, chat_id: i64, flow: F) {
        self.begin(chat_id, flow).await;
    }

    /// Ends the chat's session. Returns whether one existed.
    pub async fn clear(&self, chat_id: i64) -> bool {
        let mut inner = self.inner.lock().await;
        inner.remove(&chat_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Drops every session idle for longer than the timeout. Returns how
    /// many were removed.
    pub async fn prune_idle(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let before = inner.len();
        inner.retain(|_, entry| entry.last_activity.elapsed() <= self.idle_timeout);
        before - inner.len()
    }
}

/// Background sweep so abandoned sessions do not pile up between accesses.
pub fn spawn_expiry_task<F: Send + 'static>(sessions: Arc<SessionStore<F>>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let dropped = sessions.prune_idle().await;
            if dropped > 0 {
                tracing::info!(dropped, "expired idle sessions");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore<&'static str> {
        SessionStore::new(Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn take_removes_the_session() {
        let sessions = store();
        sessions.begin(1, "registration").await;
        assert_eq!(sessions.take(1).await, Some("registration"));
        assert_eq!(sessions.take(1).await, None);
    }

    #[tokio::test]
    async fn resume_restores_what_take_removed() {
        let sessions = store();
        sessions.begin(1, "step-one").await;
        let flow = sessions.take(1).await.unwrap();
        sessions.resume(1, flow).await;
        assert_eq!(sessions.take(1).await, Some("step-one"));
    }

    #[tokio::test]
    async fn begin_replaces_an_existing_session() {
        let sessions = store();
        sessions.begin(1, "old").await;
        sessions.begin(1, "new").await;
        assert_eq!(sessions.take(1).await, Some("new"));
    }

    #[tokio::test]
    async fn clear_reports_whether_a_session_existed() {
        let sessions = store();
        sessions.begin(1, "flow").await;
        assert!(sessions.clear(1).await);
        assert!(!sessions.clear(1).await);
    }

    #[tokio::test(start_paused = true)]
    async fn take_drops_idle_sessions() {
        let sessions = store();
        sessions.begin(1, "flow").await;
        tokio::time::advance(Duration::from_secs(3601)).await;
        assert_eq!(sessions.take(1).await, None);
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_sessions_survive_the_timeout_window() {
        let sessions = store();
        sessions.begin(1, "flow").await;
        tokio::time::advance(Duration::from_secs(3599)).await;
        assert_eq!(sessions.take(1).await, Some("flow"));
    }

    #[tokio::test(start_paused = true)]
    async fn prune_removes_only_stale_entries() {
        let sessions = store();
        sessions.begin(1, "stale").await;
        tokio::time::advance(Duration::from_secs(1800)).await;
        sessions.begin(2, "fresh").await;
        tokio::time::advance(Duration::from_secs(1801)).await;
        assert_eq!(sessions.prune_idle().await, 1);
        assert_eq!(sessions.len().await, 1);
        assert_eq!(sessions.take(2).await, Some("fresh"));
    }
}
