//! Axum Handlers for the Agent Control API
//!
//! This module contains the logic for handling HTTP requests that start,
//! stop, and inspect agent sessions. It uses `utoipa` doc comments to
//! generate OpenAPI documentation.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use switchboard_core::{agent::AgentProfile, call::CallTarget};
use tracing::error;

use crate::{
    lifecycle::{StartError, StopOutcome},
    models::{
        AgentActionResponse, AgentStatusResponse, ErrorResponse, HealthResponse, JoinCallRequest,
        LeaveCallRequest,
    },
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Another agent session is already active for the requested call.
    /// Surfaced as 400, matching the control surface contract.
    Conflict(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::Conflict(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

/// Join an agent to a call.
///
/// Called by the upstream application when a call starts. The session is
/// scheduled in the background; this returns as soon as it is registered.
#[utoipa::path(
    post,
    path = "/agent/join",
    request_body = JoinCallRequest,
    responses(
        (status = 200, description = "Agent session started", body = AgentActionResponse),
        (status = 400, description = "Agent already active for this call, or invalid request", body = ErrorResponse)
    )
)]
pub async fn join_agent_to_call(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<JoinCallRequest>,
) -> Result<Json<AgentActionResponse>, ApiError> {
    if payload.call_id.trim().is_empty() {
        return Err(ApiError::BadRequest("call_id must not be empty".to_string()));
    }

    let profile = AgentProfile {
        agent_id: payload.agent_id,
        agent_name: payload.agent_name,
        instructions: payload.instructions,
    };
    let target = CallTarget::new(payload.call_type, payload.call_id);

    match state.manager.start(profile, target) {
        Ok(handle) => Ok(Json(AgentActionResponse {
            status: "success".to_string(),
            message: format!("Agent {} joining call {}", handle.agent_id, handle.call_id),
            call_id: Some(handle.call_id.clone()),
        })),
        Err(StartError::AlreadyActive(_)) => Err(ApiError::Conflict(
            "Agent already active for this call".to_string(),
        )),
    }
}

/// Remove an agent from a call.
///
/// Always succeeds: if no agent is active for the call, the desired end
/// state already holds and the response says so.
#[utoipa::path(
    post,
    path = "/agent/leave",
    request_body = LeaveCallRequest,
    responses(
        (status = 200, description = "Agent removal requested, or no agent was active", body = AgentActionResponse)
    )
)]
pub async fn remove_agent_from_call(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LeaveCallRequest>,
) -> Json<AgentActionResponse> {
    match state.manager.stop(&payload.call_id) {
        StopOutcome::Stopped => Json(AgentActionResponse {
            status: "success".to_string(),
            message: format!("Agent removed from call {}", payload.call_id),
            call_id: Some(payload.call_id),
        }),
        StopOutcome::NotActive => Json(AgentActionResponse {
            status: "success".to_string(),
            message: "No active agent for this call".to_string(),
            call_id: None,
        }),
    }
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        active_agents: state.status.active_count(),
    })
}

/// Status of all active agent sessions.
#[utoipa::path(
    get,
    path = "/agent/status",
    responses(
        (status = 200, description = "Active session snapshot", body = AgentStatusResponse)
    )
)]
pub async fn get_agent_status(State(state): State<Arc<AppState>>) -> Json<AgentStatusResponse> {
    let snapshot = state.status.snapshot();
    Json(AgentStatusResponse {
        active_calls: snapshot.active_calls,
        total_active: snapshot.total_active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Provider};
    use crate::lifecycle::{LifecycleManager, SessionRegistry, StatusReporter};
    use async_trait::async_trait;
    use switchboard_core::agent::{AgentFactory, CallAgent};
    use tracing::Level;

    /// Factory whose agents stay in the call until cancelled.
    struct HangingFactory;

    struct HangingAgent;

    #[async_trait]
    impl CallAgent for HangingAgent {
        async fn join_call(self: Box<Self>, _target: &CallTarget) -> anyhow::Result<()> {
            std::future::pending().await
        }
    }

    #[async_trait]
    impl AgentFactory for HangingFactory {
        async fn create_agent(
            &self,
            _profile: &AgentProfile,
        ) -> anyhow::Result<Box<dyn CallAgent>> {
            Ok(Box::new(HangingAgent))
        }
    }

    fn test_state() -> Arc<AppState> {
        let config = Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            provider: Provider::OpenAI,
            openai_api_key: Some("test-key".to_string()),
            gemini_api_key: None,
            realtime_model: "gpt-4o-realtime-preview-2024-10-01".to_string(),
            edge_ws_url: "wss://edge.example.com/call".to_string(),
            session_timeout: None,
            log_level: Level::INFO,
        };
        let registry = Arc::new(SessionRegistry::new());
        let manager = Arc::new(LifecycleManager::new(
            Arc::clone(&registry),
            Arc::new(HangingFactory),
            None,
        ));
        Arc::new(AppState {
            manager,
            status: StatusReporter::new(registry),
            config: Arc::new(config),
        })
    }

    fn join_payload(call_id: &str) -> JoinCallRequest {
        JoinCallRequest {
            agent_id: "agent-42".to_string(),
            agent_name: "Concierge".to_string(),
            instructions: "Be helpful.".to_string(),
            call_type: "default".to_string(),
            call_id: call_id.to_string(),
        }
    }

    #[tokio::test]
    async fn join_rejects_blank_call_id() {
        let state = test_state();

        let result =
            join_agent_to_call(State(Arc::clone(&state)), Json(join_payload("  "))).await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert_eq!(state.status.active_count(), 0);
    }

    #[tokio::test]
    async fn join_twice_conflicts_on_second_request() {
        let state = test_state();

        let first =
            join_agent_to_call(State(Arc::clone(&state)), Json(join_payload("call-1"))).await;
        assert!(first.is_ok());
        let body = first.unwrap().0;
        assert_eq!(body.status, "success");
        assert_eq!(body.call_id.as_deref(), Some("call-1"));

        let second =
            join_agent_to_call(State(Arc::clone(&state)), Json(join_payload("call-1"))).await;
        assert!(matches!(second, Err(ApiError::Conflict(_))));
        assert_eq!(state.status.active_count(), 1);
    }

    #[tokio::test]
    async fn leave_distinguishes_active_from_absent() {
        let state = test_state();
        join_agent_to_call(State(Arc::clone(&state)), Json(join_payload("call-1")))
            .await
            .unwrap();

        let removed = remove_agent_from_call(
            State(Arc::clone(&state)),
            Json(LeaveCallRequest {
                call_id: "call-1".to_string(),
            }),
        )
        .await;
        assert_eq!(removed.0.message, "Agent removed from call call-1");
        assert_eq!(removed.0.call_id.as_deref(), Some("call-1"));

        let absent = remove_agent_from_call(
            State(Arc::clone(&state)),
            Json(LeaveCallRequest {
                call_id: "no-such-call".to_string(),
            }),
        )
        .await;
        assert_eq!(absent.0.message, "No active agent for this call");
        assert!(absent.0.call_id.is_none());
    }

    #[tokio::test]
    async fn health_and_status_agree_on_counts() {
        let state = test_state();
        join_agent_to_call(State(Arc::clone(&state)), Json(join_payload("call-a")))
            .await
            .unwrap();
        join_agent_to_call(State(Arc::clone(&state)), Json(join_payload("call-b")))
            .await
            .unwrap();

        let health = health_check(State(Arc::clone(&state))).await;
        let status = get_agent_status(State(Arc::clone(&state))).await;

        assert_eq!(health.0.status, "healthy");
        assert_eq!(health.0.active_agents, status.0.total_active);
        assert_eq!(status.0.active_calls.len(), 2);
    }

    #[test]
    fn api_error_status_codes() {
        let bad = ApiError::BadRequest("call_id must not be empty".to_string()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let conflict =
            ApiError::Conflict("Agent already active for this call".to_string()).into_response();
        assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);

        let internal =
            ApiError::InternalServerError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
