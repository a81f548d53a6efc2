//! Remote data sources for league standings and manager history
//!
//! [`FantasySource`] is the seam between the aggregation engine and the
//! network. [`FplClient`] implements it over HTTP; tests substitute
//! in-memory sources.

use async_trait::async_trait;

use crate::types::{FetchOutcome, LeagueId, LeagueStandingsPage, ManagerHistory, TeamId};

mod http;

pub use http::FplClient;

/// Trait for fetching league standings pages and manager histories
///
/// Implementations never fail loudly: every transport error, non-success
/// status or undecodable body is reported as [`FetchOutcome::Unavailable`].
/// No retries are performed at this layer.
///
/// # Examples
///
/// ```no_run
/// use gw_leaderboard::config::RemoteConfig;
/// use gw_leaderboard::source::{FantasySource, FplClient};
/// use gw_leaderboard::types::{FetchOutcome, LeagueId};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FplClient::new(&RemoteConfig::default())?;
///
/// if let FetchOutcome::Available(page) = client.standings_page(LeagueId(208271), 1).await {
///     println!("{} members on page {}", page.results.len(), page.page);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait FantasySource: Send + Sync {
    /// Fetch one page of a league's standings
    ///
    /// # Arguments
    ///
    /// * `league_id` - Classic league to read
    /// * `page` - 1-based page number
    async fn standings_page(
        &self,
        league_id: LeagueId,
        page: u32,
    ) -> FetchOutcome<LeagueStandingsPage>;

    /// Fetch a manager's season history
    async fn manager_history(&self, team_id: TeamId) -> FetchOutcome<ManagerHistory>;
}
