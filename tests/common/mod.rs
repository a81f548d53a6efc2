//! Common test utilities for gw-leaderboard integration tests

#[allow(dead_code)]
pub mod fixtures;

pub use fixtures::*;
