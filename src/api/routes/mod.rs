//! Route handlers for the worker API
//!
//! - [`process`] - Leaderboard computation
//! - [`system`] - Health, events, OpenAPI

mod process;
mod system;

pub use process::*;
pub use system::*;
