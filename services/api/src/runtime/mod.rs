//! Realtime Agent Runtimes
//!
//! Concrete [`AgentFactory`] implementations backed by realtime voice
//! providers. An agent joins its call through the call edge WebSocket and
//! holds a second WebSocket to the configured provider; the two are bridged
//! until the edge closes, which ends the session. Audio frames are relayed
//! opaquely: the edge carries 16 kHz PCM16 and the runtimes never inspect
//! or transform it.

pub mod gemini;
pub mod openai;

use crate::config::{Config, Provider};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use switchboard_core::agent::{AgentFactory, AgentProfile, CallAgent};
use switchboard_core::call::CallTarget;

/// The greeting every agent opens with after joining a call.
pub(crate) const INITIAL_GREETING: &str =
    "Hello! I'm your AI assistant. How can I help you today?";

/// Builds call agents backed by the configured realtime provider.
pub struct RealtimeAgentFactory {
    config: Arc<Config>,
}

impl RealtimeAgentFactory {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AgentFactory for RealtimeAgentFactory {
    async fn create_agent(&self, profile: &AgentProfile) -> Result<Box<dyn CallAgent>> {
        let agent: Box<dyn CallAgent> = match self.config.provider {
            Provider::OpenAI => Box::new(openai::OpenAiRealtimeAgent::new(
                Arc::clone(&self.config),
                profile.clone(),
            )),
            Provider::Gemini => Box::new(gemini::GeminiLiveAgent::new(
                Arc::clone(&self.config),
                profile.clone(),
            )),
        };
        Ok(agent)
    }
}

/// Resolves the edge WebSocket URL for a call.
pub(crate) fn edge_url(config: &Config, target: &CallTarget) -> String {
    format!(
        "{}/{}/{}",
        config.edge_ws_url.trim_end_matches('/'),
        target.call_type,
        target.call_id
    )
}
