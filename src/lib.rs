//! # gw-leaderboard
//!
//! Gameweek leaderboards for Fantasy Premier League classic leagues.
//!
//! Given a league and a gameweek, the engine walks the league's standings
//! pages, fetches every member's season history with bounded concurrency,
//! and returns the members ranked by points scored in that gameweek.
//!
//! The crate ships three layers:
//! - [`LeaderboardEngine`] - the computation itself
//! - [`api`] - a worker HTTP server exposing the engine at `POST /process`
//! - [`proxy`] - a front server that forwards to the worker, enforces an
//!   outer deadline and alerts operators when the worker is down
//!
//! ## Quick Start
//!
//! ```no_run
//! use gw_leaderboard::{Config, LeaderboardEngine, LeagueId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = LeaderboardEngine::new(Config::default())?;
//!
//!     // Subscribe to progress events
//!     let mut events = engine.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let board = engine.compute_leaderboard(LeagueId(208271), 5).await?;
//!     for row in &board.rows {
//!         println!("{} {}", row.team_name(), row.gw_points());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Operator alerts for worker outages
pub mod alerts;
/// Worker REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Leaderboard engine (decomposed into focused submodules)
pub mod leaderboard;
/// Proxy in front of the worker
pub mod proxy;
/// Remote data sources
pub mod source;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use alerts::{AlertKind, AlertNotifier, AlertPayload};
pub use config::Config;
pub use error::{ApiError, Error, ErrorDetail, Result, SimpleError, ToHttpStatus};
pub use leaderboard::{LeaderboardEngine, Stage, rank_rows};
pub use proxy::{ProxyClient, ProxyHealth};
pub use source::{FantasySource, FplClient};
pub use types::{
    Event, FavoriteLeague, FetchOutcome, GameweekRecord, Leaderboard, LeaderboardRow,
    LeagueId, LeagueStandingsPage, ManagerHistory, MemberSummary, ProcessRequest,
    ProcessResponse, StandingsEntry, TeamId, parse_favorite_leagues,
};

use tokio_util::sync::CancellationToken;

/// Token cancelled when the process receives a termination signal.
///
/// Pass it to [`api::start_api_server`] or [`proxy::start_proxy_server`] to
/// stop serving gracefully.
///
/// - **Unix:** listens for SIGTERM and SIGINT, falling back to whichever can be registered.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Must be called from within a tokio runtime.
///
/// # Example
///
/// ```no_run
/// use gw_leaderboard::{Config, LeaderboardEngine, shutdown_on_signal};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Arc::new(Config::default());
///     let engine = Arc::new(LeaderboardEngine::new((*config).clone())?);
///
///     gw_leaderboard::api::start_api_server(engine, config, shutdown_on_signal()).await?;
///     Ok(())
/// }
/// ```
pub fn shutdown_on_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutting down");
        trigger.cancel();
    });
    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments (containers, tests)
    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
