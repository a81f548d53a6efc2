//! Application state for the worker API server

use crate::{Config, LeaderboardEngine};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// The leaderboard engine
    pub engine: Arc<LeaderboardEngine>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(engine: Arc<LeaderboardEngine>, config: Arc<Config>) -> Self {
        Self { engine, config }
    }
}
