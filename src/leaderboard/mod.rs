//! Leaderboard computation split into focused submodules.
//!
//! A computation runs three stages in order, never going back:
//! - [`collector`] - `CollectingLeague`: follow standings pagination
//! - [`aggregation`] - `AggregatingMembers`: bounded-concurrency history fetches
//! - [`ranking`] - `Ranked`: stable sort by gameweek points
//!
//! A league that yields no members ends the computation with
//! [`Error::LeagueFetchFailed`] before aggregation starts.

mod aggregation;
mod collector;
mod ranking;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use ranking::rank_rows;

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::source::{FantasySource, FplClient};
use crate::types::{Event, Leaderboard, LeagueId};

use aggregation::{AggregateMembersParams, aggregate_members};
use collector::collect_league;

/// Stage of a leaderboard computation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Reading standings pages
    CollectingLeague,
    /// Fetching member histories
    AggregatingMembers,
    /// Rows sorted and returned
    Ranked,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::CollectingLeague => "collecting_league",
            Stage::AggregatingMembers => "aggregating_members",
            Stage::Ranked => "ranked",
        };
        f.write_str(name)
    }
}

/// Computes gameweek leaderboards from a [`FantasySource`]
///
/// Every call recomputes from scratch; nothing is cached between requests.
/// Progress is reported through `tracing` and through [`Event`]s on a
/// broadcast channel (see [`LeaderboardEngine::subscribe`]).
pub struct LeaderboardEngine {
    source: Arc<dyn FantasySource>,
    config: Arc<Config>,
    event_tx: broadcast::Sender<Event>,
}

impl LeaderboardEngine {
    /// Create an engine that talks to the remote API over HTTP
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let source: Arc<dyn FantasySource> = Arc::new(FplClient::new(&config.remote)?);
        Ok(Self::with_source(config, source))
    }

    /// Create an engine over an arbitrary source
    pub fn with_source(config: Config, source: Arc<dyn FantasySource>) -> Self {
        let (event_tx, _rx) = broadcast::channel(1000);
        Self {
            source,
            config: Arc::new(config),
            event_tx,
        }
    }

    /// Subscribe to computation events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Current configuration
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Maximum member fetches in flight
    pub fn max_concurrent_fetches(&self) -> usize {
        self.config.aggregation.max_concurrent_fetches
    }

    /// Compute the leaderboard of `league_id` for a 1-based `gameweek`.
    ///
    /// The gameweek is not range-checked; a gameweek beyond every member's
    /// history (or gameweek 0) yields an empty leaderboard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LeagueFetchFailed`] when no member could be collected.
    /// Failures fetching individual members only reduce the row count.
    pub async fn compute_leaderboard(
        &self,
        league_id: LeagueId,
        gameweek: u32,
    ) -> Result<Leaderboard> {
        tracing::info!(league_id = %league_id, gameweek, "Processing leaderboard request");
        self.event_tx
            .send(Event::LeagueCollectionStarted {
                league_id,
                gameweek,
            })
            .ok();

        tracing::debug!(league_id = %league_id, stage = %Stage::CollectingLeague, "Entering stage");
        let members = collect_league(
            self.source.as_ref(),
            league_id,
            self.config.aggregation.max_pages,
            &self.event_tx,
        )
        .await;

        if members.is_empty() {
            let error = Error::LeagueFetchFailed {
                league_id: league_id.0,
            };
            tracing::warn!(league_id = %league_id, gameweek, "No league members collected");
            self.event_tx
                .send(Event::LeaderboardFailed {
                    league_id,
                    gameweek,
                    message: error.to_string(),
                })
                .ok();
            return Err(error);
        }

        let total_members = members.len();
        self.event_tx
            .send(Event::LeagueCollected {
                league_id,
                total_members,
            })
            .ok();

        let concurrency = self.max_concurrent_fetches();
        tracing::info!(
            league_id = %league_id,
            total_members,
            concurrency,
            stage = %Stage::AggregatingMembers,
            "Starting member aggregation"
        );
        let outcome = aggregate_members(AggregateMembersParams {
            league_id,
            members,
            gameweek,
            concurrency,
            progress_interval: self.config.aggregation.progress_interval,
            source: &self.source,
            event_tx: &self.event_tx,
        })
        .await;

        tracing::info!(
            league_id = %league_id,
            processed = outcome.processed,
            total_members,
            "Member aggregation complete"
        );

        let rows = rank_rows(outcome.rows);
        tracing::info!(
            league_id = %league_id,
            gameweek,
            rows = rows.len(),
            stage = %Stage::Ranked,
            "Leaderboard ready"
        );

        self.event_tx
            .send(Event::LeaderboardComplete {
                league_id,
                gameweek,
                rows: rows.len(),
                processed: outcome.processed,
                total: total_members,
                completed_at: chrono::Utc::now(),
            })
            .ok();

        Ok(Leaderboard {
            league_id,
            gameweek,
            rows,
            processed: outcome.processed,
            total_members,
        })
    }
}
