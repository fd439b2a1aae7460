//! Agent Collaborator Contracts
//!
//! The control plane does not know how an agent produces speech or video; it
//! only needs two seams: something that constructs an agent from a profile
//! ([`AgentFactory`]) and something that joins the constructed agent to a
//! call and runs it until the call ends ([`CallAgent`]). Concrete
//! implementations live in the service crates.

use crate::call::CallTarget;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Identity and behavior of a single agent, as configured by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Unique identifier for the agent.
    pub agent_id: String,
    /// Display name the agent presents in the call.
    pub agent_name: String,
    /// Custom instructions driving the agent's behavior.
    pub instructions: String,
}

/// Constructs agents from their profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentFactory: Send + Sync {
    /// Produces an agent capable of joining a call and running a
    /// conversational session.
    async fn create_agent(&self, profile: &AgentProfile) -> Result<Box<dyn CallAgent>>;
}

/// A constructed agent, ready to join exactly one call.
///
/// `join_call` consumes the agent: a session that has ended (for any reason)
/// is never rejoined, a fresh agent is constructed instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallAgent: Send + Sync {
    /// Joins the call and runs the conversational session, returning once
    /// the session naturally ends.
    ///
    /// Implementations must be cancel-safe at their await points; the
    /// scheduler drops this future to cancel a session.
    async fn join_call(self: Box<Self>, target: &CallTarget) -> Result<()>;
}

/// Creates an agent from `factory` and joins it to `target`, returning when
/// the session ends.
///
/// This is the unit of work the lifecycle manager schedules per call.
pub async fn launch_session(
    factory: &dyn AgentFactory,
    profile: &AgentProfile,
    target: &CallTarget,
) -> Result<()> {
    let agent = factory.create_agent(profile).await?;
    info!(agent_name = %profile.agent_name, call = %target, "Agent joining call");
    agent.join_call(target).await?;
    info!(agent_name = %profile.agent_name, call = %target, "Agent left call");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> AgentProfile {
        AgentProfile {
            agent_id: "agent-1".to_string(),
            agent_name: "Concierge".to_string(),
            instructions: "Be helpful.".to_string(),
        }
    }

    #[tokio::test]
    async fn launch_constructs_then_joins() {
        let mut factory = MockAgentFactory::new();
        factory.expect_create_agent().times(1).returning(|_| {
            let mut agent = MockCallAgent::new();
            agent.expect_join_call().times(1).returning(|_| Ok(()));
            Ok(Box::new(agent))
        });

        let target = CallTarget::new("default", "call-1");
        launch_session(&factory, &profile(), &target).await.unwrap();
    }

    #[tokio::test]
    async fn construction_failure_skips_join() {
        let mut factory = MockAgentFactory::new();
        factory
            .expect_create_agent()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("no transport available")));

        let target = CallTarget::new("default", "call-1");
        let err = launch_session(&factory, &profile(), &target)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no transport"));
    }

    #[tokio::test]
    async fn join_failure_is_propagated() {
        let mut factory = MockAgentFactory::new();
        factory.expect_create_agent().returning(|_| {
            let mut agent = MockCallAgent::new();
            agent
                .expect_join_call()
                .returning(|_| Err(anyhow::anyhow!("edge refused the join")));
            Ok(Box::new(agent))
        });

        let target = CallTarget::new("default", "call-1");
        let err = launch_session(&factory, &profile(), &target)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("edge refused"));
    }
}
