//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the agent control endpoints and the OpenAPI documentation.

use crate::{
    handlers,
    models::{
        AgentActionResponse, AgentStatusResponse, ErrorResponse, HealthResponse, JoinCallRequest,
        LeaveCallRequest,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::join_agent_to_call,
        handlers::remove_agent_from_call,
        handlers::health_check,
        handlers::get_agent_status,
    ),
    components(
        schemas(JoinCallRequest, LeaveCallRequest, AgentActionResponse, HealthResponse, AgentStatusResponse, ErrorResponse)
    ),
    tags(
        (name = "Switchboard API", description = "Agent lifecycle control for real-time calls")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route("/agent/join", post(handlers::join_agent_to_call))
        .route("/agent/leave", post(handlers::remove_agent_from_call))
        .route("/health", get(handlers::health_check))
        .route("/agent/status", get(handlers::get_agent_status))
        // Apply the state ONLY to this group of routes.
        .with_state(app_state);

    // Merge the stateful routes with the stateless Swagger UI routes.
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
