//! Switchboard Core Library
//!
//! Domain contracts shared by the switchboard services: the identity of an
//! agent joining a call, the collaborator traits the control plane schedules
//! ([`agent::AgentFactory`], [`agent::CallAgent`]), and the composition that
//! runs one agent-in-call session from construction to its natural end.

pub mod agent;
pub mod call;
