//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the lifecycle
//! manager and status reporter shared by all handlers.

use crate::config::Config;
use crate::lifecycle::{LifecycleManager, StatusReporter};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<LifecycleManager>,
    pub status: StatusReporter,
    pub config: Arc<Config>,
}
