//! Session Handles
//!
//! A [`SessionHandle`] is the control plane's view of one agent-in-call unit
//! of work: who is in which call, a token to request cancellation, and a
//! latch that trips once the session has reached a terminal state and its
//! registry entry has been reclaimed.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Handle to one running agent session.
///
/// Handles are minted fresh by every `start`; a handle that has left the
/// registry is never reused or re-inserted.
pub struct SessionHandle {
    /// Unique identity of this handle.
    pub id: Uuid,
    pub call_id: String,
    pub agent_id: String,
    pub agent_name: String,
    pub started_at: DateTime<Utc>,
    cancel: CancellationToken,
    done: CancellationToken,
}

impl SessionHandle {
    /// Creates a handle for a session that is about to be scheduled.
    pub fn new(
        call_id: impl Into<String>,
        agent_id: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            call_id: call_id.into(),
            agent_id: agent_id.into(),
            agent_name: agent_name.into(),
            started_at: Utc::now(),
            cancel: CancellationToken::new(),
            done: CancellationToken::new(),
        }
    }

    /// Requests cooperative cancellation of the session's unit of work.
    ///
    /// Returns immediately; the session unwinds at its next await point and
    /// cleanup happens through the same path as natural completion.
    pub fn request_cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation has been requested for this session.
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token the session task races its work against.
    pub(crate) fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Trips the completion latch. Called exactly once, by the session
    /// task's cleanup epilogue.
    pub(crate) fn mark_done(&self) {
        self.done.cancel();
    }

    /// Whether the session has reached a terminal state and been cleaned up.
    pub fn is_done(&self) -> bool {
        self.done.is_cancelled()
    }

    /// Waits until the session has terminated and its registry entry has
    /// been removed. The latch is one-shot: waiters that arrive after the
    /// trip return immediately.
    pub async fn done(&self) {
        self.done.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_handle_is_neither_cancelled_nor_done() {
        let handle = SessionHandle::new("call-1", "agent-1", "Concierge");

        assert!(!handle.is_cancel_requested());
        assert!(!handle.is_done());
    }

    #[test]
    fn handles_are_minted_with_distinct_ids() {
        let a = SessionHandle::new("call-1", "agent-1", "Concierge");
        let b = SessionHandle::new("call-1", "agent-1", "Concierge");

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn cancel_request_reaches_the_task_token() {
        let handle = SessionHandle::new("call-1", "agent-1", "Concierge");
        let token = handle.cancel_token();

        handle.request_cancel();

        assert!(handle.is_cancel_requested());
        token.cancelled().await;
    }

    #[tokio::test]
    async fn done_latch_wakes_a_pending_waiter() {
        let handle = std::sync::Arc::new(SessionHandle::new("call-1", "agent-1", "Concierge"));

        let waiter = {
            let handle = std::sync::Arc::clone(&handle);
            tokio::spawn(async move { handle.done().await })
        };

        handle.mark_done();
        waiter.await.unwrap();
        assert!(handle.is_done());
    }

    #[tokio::test]
    async fn done_latch_is_observable_after_the_fact() {
        let handle = SessionHandle::new("call-1", "agent-1", "Concierge");

        handle.mark_done();

        // A waiter that shows up late must not block.
        handle.done().await;
        assert!(handle.is_done());
    }
}
