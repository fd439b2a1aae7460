//! Lifecycle Manager
//!
//! Orchestrates the start and stop of agent sessions. `start` registers
//! first and spawns second, so a losing concurrent start schedules no work;
//! `stop` only requests cancellation. Every terminal transition (natural
//! completion, failure, cancellation, timeout) converges on the session
//! task's single cleanup epilogue, which removes the registry entry and
//! trips the handle's completion latch exactly once.

use super::registry::SessionRegistry;
use super::session::SessionHandle;
use std::sync::Arc;
use std::time::Duration;
use switchboard_core::agent::{AgentFactory, AgentProfile, launch_session};
use switchboard_core::call::CallTarget;
use tracing::{Instrument, error, info, info_span, warn};

/// Failure starting a session.
///
/// `AlreadyActive` is the only synchronous failure: every other failure mode
/// belongs to the session's own unit of work and is reported asynchronously
/// through its logs and cleanup.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("agent already active for call {0}")]
    AlreadyActive(String),
}

/// Result of a stop request.
///
/// `NotActive` is a benign no-op, not an error: the desired end state,
/// "no agent for this call", already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotActive,
}

/// How a session's unit of work reached its terminal state.
#[derive(Debug)]
enum SessionEnd {
    Completed,
    Cancelled,
    TimedOut,
    Failed(anyhow::Error),
}

/// Starts, tracks, and stops agent sessions against a shared registry.
pub struct LifecycleManager {
    registry: Arc<SessionRegistry>,
    factory: Arc<dyn AgentFactory>,
    session_timeout: Option<Duration>,
}

impl LifecycleManager {
    pub fn new(
        registry: Arc<SessionRegistry>,
        factory: Arc<dyn AgentFactory>,
        session_timeout: Option<Duration>,
    ) -> Self {
        Self {
            registry,
            factory,
            session_timeout,
        }
    }

    /// Starts an agent session for `target`.
    ///
    /// The registry entry is created before any work is scheduled; if the
    /// call already has an active session, nothing is spawned and
    /// [`StartError::AlreadyActive`] is returned. On success this returns as
    /// soon as the session task is spawned; the session runs to its own
    /// terminal state in the background, and its entry is reclaimed there.
    pub fn start(
        &self,
        profile: AgentProfile,
        target: CallTarget,
    ) -> Result<Arc<SessionHandle>, StartError> {
        let handle = Arc::new(SessionHandle::new(
            target.call_id.as_str(),
            profile.agent_id.as_str(),
            profile.agent_name.as_str(),
        ));
        if !self.registry.insert(Arc::clone(&handle)) {
            return Err(StartError::AlreadyActive(target.call_id));
        }

        info!(
            agent_id = %profile.agent_id,
            call_id = %target.call_id,
            "Starting agent session"
        );

        let registry = Arc::clone(&self.registry);
        let factory = Arc::clone(&self.factory);
        let timeout = self.session_timeout;
        let task_handle = Arc::clone(&handle);
        let span = info_span!(
            "agent_session",
            call_id = %target.call_id,
            agent_id = %profile.agent_id
        );
        tokio::spawn(
            async move {
                let end =
                    run_session(factory.as_ref(), &profile, &target, &task_handle, timeout).await;

                // Single cleanup path for every terminal transition. The
                // entry is removed before the latch trips, so a waiter that
                // observes `done` also observes the registry without it.
                registry.remove(&target.call_id);
                task_handle.mark_done();

                match end {
                    SessionEnd::Completed => info!("Agent session finished"),
                    SessionEnd::Cancelled => info!("Agent session cancelled"),
                    SessionEnd::TimedOut => {
                        warn!("Agent session exceeded the configured timeout")
                    }
                    SessionEnd::Failed(err) => {
                        error!(error = ?err, "Agent session terminated with error")
                    }
                }
            }
            .instrument(span),
        );

        Ok(handle)
    }

    /// Requests cancellation of the session for `call_id`, if one is active.
    ///
    /// Cancel-only: the registry entry is removed by the session task's
    /// cleanup path, the same one used for natural completion, so a stop
    /// racing a natural end results in exactly one removal. Returns without
    /// waiting for the session to unwind.
    pub fn stop(&self, call_id: &str) -> StopOutcome {
        match self.registry.get(call_id) {
            Some(handle) => {
                handle.request_cancel();
                info!(call_id, "Requested agent session cancellation");
                StopOutcome::Stopped
            }
            None => StopOutcome::NotActive,
        }
    }
}

/// Drives one session to a terminal state: the agent's run routine raced
/// against cancellation and, when configured, the session lifetime bound.
async fn run_session(
    factory: &dyn AgentFactory,
    profile: &AgentProfile,
    target: &CallTarget,
    handle: &SessionHandle,
    timeout: Option<Duration>,
) -> SessionEnd {
    let cancel = handle.cancel_token();
    let run = async {
        let result = match timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, launch_session(factory, profile, target)).await {
                    Ok(result) => result,
                    Err(_) => return SessionEnd::TimedOut,
                }
            }
            None => launch_session(factory, profile, target).await,
        };
        match result {
            Ok(()) => SessionEnd::Completed,
            Err(err) => SessionEnd::Failed(err),
        }
    };

    tokio::select! {
        () = cancel.cancelled() => SessionEnd::Cancelled,
        end = run => end,
    }
}
