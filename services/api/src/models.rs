//! API Models
//!
//! JSON request and response bodies for the agent control endpoints, shared
//! between the axum handlers and the generated OpenAPI documentation.

use serde::{Deserialize, Serialize};
use switchboard_core::call::DEFAULT_CALL_TYPE;
use utoipa::ToSchema;

fn default_call_type() -> String {
    DEFAULT_CALL_TYPE.to_string()
}

/// Request to join an agent to a call.
#[derive(Deserialize, Debug, ToSchema)]
pub struct JoinCallRequest {
    #[schema(example = "agent-42")]
    pub agent_id: String,
    #[schema(example = "Concierge")]
    pub agent_name: String,
    #[schema(example = "You are a helpful meeting assistant.")]
    pub instructions: String,
    #[serde(default = "default_call_type")]
    #[schema(example = "default")]
    pub call_type: String,
    pub call_id: String,
}

/// Request to remove an agent from a call.
#[derive(Deserialize, Debug, ToSchema)]
pub struct LeaveCallRequest {
    pub call_id: String,
}

/// Outcome of a join or leave request.
#[derive(Serialize, Debug, ToSchema)]
pub struct AgentActionResponse {
    #[schema(example = "success")]
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

/// Service liveness summary.
#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub active_agents: usize,
}

/// Point-in-time view of all active agent sessions.
#[derive(Serialize, Debug, ToSchema)]
pub struct AgentStatusResponse {
    pub active_calls: Vec<String>,
    pub total_active: usize,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_request_defaults_call_type() {
        let json = r#"{
            "agent_id": "agent-42",
            "agent_name": "Concierge",
            "instructions": "Be helpful.",
            "call_id": "call-123"
        }"#;
        let request: JoinCallRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.call_type, "default");
        assert_eq!(request.call_id, "call-123");
    }

    #[test]
    fn test_join_request_explicit_call_type() {
        let json = r#"{
            "agent_id": "agent-42",
            "agent_name": "Concierge",
            "instructions": "Be helpful.",
            "call_type": "livestream",
            "call_id": "call-123"
        }"#;
        let request: JoinCallRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.call_type, "livestream");
    }

    #[test]
    fn test_join_request_requires_call_id() {
        let json = r#"{
            "agent_id": "agent-42",
            "agent_name": "Concierge",
            "instructions": "Be helpful."
        }"#;
        let result: Result<JoinCallRequest, _> = serde_json::from_str(json);

        assert!(result.is_err());
    }

    #[test]
    fn test_leave_request_deserialization() {
        let json = r#"{"call_id": "call-123"}"#;
        let request: LeaveCallRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.call_id, "call-123");
    }

    #[test]
    fn test_action_response_skips_absent_call_id() {
        let response = AgentActionResponse {
            status: "success".to_string(),
            message: "No active agent for this call".to_string(),
            call_id: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("call_id"));
    }

    #[test]
    fn test_action_response_includes_call_id() {
        let response = AgentActionResponse {
            status: "success".to_string(),
            message: "Agent agent-42 joining call call-123".to_string(),
            call_id: Some("call-123".to_string()),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""call_id":"call-123""#));
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            active_agents: 3,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"healthy","active_agents":3}"#);
    }

    #[test]
    fn test_status_response_serialization() {
        let response = AgentStatusResponse {
            active_calls: vec!["call-a".to_string(), "call-b".to_string()],
            total_active: 2,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""active_calls":["call-a","call-b"]"#));
        assert!(json.contains(r#""total_active":2"#));
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "Agent already active for this call".to_string(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(
            json,
            r#"{"message":"Agent already active for this call"}"#
        );
    }
}
