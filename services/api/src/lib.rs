//! Switchboard API Library Crate
//!
//! This library contains all the core logic for the switchboard web service:
//! configuration, the call-agent lifecycle (registry, manager, status
//! reporting), the HTTP handlers and routing, and the realtime agent
//! runtimes. The `api` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod router;
pub mod runtime;
pub mod state;
