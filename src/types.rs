//! Core types for gw-leaderboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a classic league
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct LeagueId(pub u64);

impl From<u64> for LeagueId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LeagueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a manager's team (the remote API calls it an "entry")
///
/// Unique within a league; used as the identity of a leaderboard row.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct TeamId(pub u64);

impl From<u64> for TeamId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a single remote fetch
///
/// Transport errors, non-success statuses and malformed payloads all become
/// [`FetchOutcome::Unavailable`]; callers only decide whether to carry on.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The payload was fetched and decoded
    Available(T),
    /// Nothing usable came back
    Unavailable,
}

impl<T> FetchOutcome<T> {
    /// Whether a payload is present
    pub fn is_available(&self) -> bool {
        matches!(self, FetchOutcome::Available(_))
    }

    /// Convert into an `Option`, discarding the distinction
    pub fn into_option(self) -> Option<T> {
        match self {
            FetchOutcome::Available(value) => Some(value),
            FetchOutcome::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for FetchOutcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FetchOutcome::Available(v),
            None => FetchOutcome::Unavailable,
        }
    }
}

/// One league member as listed in the standings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MemberSummary {
    /// Standings row id
    #[serde(rename = "id", default)]
    pub member_id: i64,
    /// Team (entry) id
    #[serde(rename = "entry")]
    pub team_id: TeamId,
    /// Manager's display name
    #[serde(rename = "player_name")]
    pub manager_name: String,
    /// Team name
    #[serde(rename = "entry_name")]
    pub team_name: String,
    /// Season total points
    #[serde(rename = "total")]
    pub total_points: i64,
    /// Rank within the league standings
    #[serde(rename = "rank")]
    pub overall_rank: i64,
}

/// One standings entry exactly as the remote API listed it
///
/// Entries are decoded into a [`MemberSummary`] one at a time, so a malformed
/// entry costs only that member and never the page it came on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandingsEntry(serde_json::Value);

impl StandingsEntry {
    /// Wrap a raw standings entry
    pub fn new(raw: serde_json::Value) -> Self {
        Self(raw)
    }

    /// Team id, when the entry carries a readable one
    pub fn team_id(&self) -> Option<TeamId> {
        self.0.get("entry").and_then(serde_json::Value::as_u64).map(TeamId)
    }

    /// Decode the member fields
    ///
    /// # Errors
    ///
    /// Fails when a required field is missing or has the wrong type.
    pub fn decode(&self) -> serde_json::Result<MemberSummary> {
        MemberSummary::deserialize(&self.0)
    }

    /// The entry as received
    pub fn raw(&self) -> &serde_json::Value {
        &self.0
    }
}

/// One page of league standings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeagueStandingsPage {
    /// 1-based page number
    pub page: u32,
    /// Entries listed on this page, in standings order
    pub results: Vec<StandingsEntry>,
    /// Whether the server reports another page after this one
    pub has_next: bool,
}

/// Wire shape of a standings response: `{"standings": {...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct StandingsResponse {
    pub(crate) standings: StandingsBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StandingsBody {
    #[serde(default)]
    pub(crate) page: Option<u32>,
    pub(crate) results: Vec<StandingsEntry>,
    #[serde(default)]
    pub(crate) has_next: bool,
}

impl StandingsResponse {
    /// Build the page, falling back to the requested page number when the body omits it
    pub(crate) fn into_page(self, requested: u32) -> LeagueStandingsPage {
        LeagueStandingsPage {
            page: self.standings.page.unwrap_or(requested),
            results: self.standings.results,
            has_next: self.standings.has_next,
        }
    }
}

/// Points scored by a manager in one gameweek
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GameweekRecord {
    /// 1-based gameweek number
    #[serde(rename = "event")]
    pub gameweek: u32,
    /// Points scored before transfer deductions
    pub points: i64,
    /// Points deducted for extra transfers
    #[serde(rename = "event_transfers_cost")]
    pub transfer_cost: i64,
}

/// A manager's season so far, one record per gameweek played
///
/// Managers who joined late have fewer records than the current gameweek.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ManagerHistory {
    /// Per-gameweek records, position `n - 1` holds gameweek `n`
    pub current: Vec<GameweekRecord>,
}

impl ManagerHistory {
    /// Number of gameweek records
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Whether no gameweek has been recorded
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Record for a 1-based gameweek, by position
    ///
    /// Returns `None` for gameweek 0 and for gameweeks past the end of the history.
    pub fn gameweek(&self, gameweek: u32) -> Option<&GameweekRecord> {
        let index = (gameweek as usize).checked_sub(1)?;
        self.current.get(index)
    }
}

/// One row of a gameweek leaderboard
///
/// `net_points` is derived from `gw_points - transfer_cost` on construction
/// and on deserialization; it is never set independently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaderboardRow {
    team_id: TeamId,
    manager_name: String,
    team_name: String,
    gw_points: i64,
    transfer_cost: i64,
    net_points: i64,
    total_points: i64,
    overall_rank: i64,
}

#[derive(Deserialize)]
struct LeaderboardRowWire {
    team_id: TeamId,
    manager_name: String,
    team_name: String,
    gw_points: i64,
    transfer_cost: i64,
    total_points: i64,
    overall_rank: i64,
}

impl<'de> Deserialize<'de> for LeaderboardRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        LeaderboardRowWire::deserialize(deserializer).map(Self::from)
    }
}

impl From<LeaderboardRowWire> for LeaderboardRow {
    fn from(wire: LeaderboardRowWire) -> Self {
        Self {
            team_id: wire.team_id,
            manager_name: wire.manager_name,
            team_name: wire.team_name,
            gw_points: wire.gw_points,
            transfer_cost: wire.transfer_cost,
            net_points: wire.gw_points - wire.transfer_cost,
            total_points: wire.total_points,
            overall_rank: wire.overall_rank,
        }
    }
}

impl LeaderboardRow {
    /// Build a row from a member and that member's record for the requested gameweek
    pub fn new(member: &MemberSummary, record: &GameweekRecord) -> Self {
        Self {
            team_id: member.team_id,
            manager_name: member.manager_name.clone(),
            team_name: member.team_name.clone(),
            gw_points: record.points,
            transfer_cost: record.transfer_cost,
            net_points: record.points - record.transfer_cost,
            total_points: member.total_points,
            overall_rank: member.overall_rank,
        }
    }

    /// Team id (row identity)
    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Manager's display name
    pub fn manager_name(&self) -> &str {
        &self.manager_name
    }

    /// Team name
    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    /// Gameweek points before deductions
    pub fn gw_points(&self) -> i64 {
        self.gw_points
    }

    /// Transfer deduction for the gameweek
    pub fn transfer_cost(&self) -> i64 {
        self.transfer_cost
    }

    /// Gameweek points after deductions
    pub fn net_points(&self) -> i64 {
        self.net_points
    }

    /// Season total points
    pub fn total_points(&self) -> i64 {
        self.total_points
    }

    /// League standings rank
    pub fn overall_rank(&self) -> i64 {
        self.overall_rank
    }
}

/// A ranked gameweek leaderboard plus the counts the caller needs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Leaderboard {
    /// League the leaderboard was built for
    pub league_id: LeagueId,
    /// Requested gameweek
    pub gameweek: u32,
    /// Rows sorted by gameweek points, highest first
    pub rows: Vec<LeaderboardRow>,
    /// Members processed (successful or skipped)
    pub processed: usize,
    /// Members collected from the standings
    pub total_members: usize,
}

impl Leaderboard {
    /// Number of rows produced
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A league offered to the user for quick selection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FavoriteLeague {
    /// League id
    pub id: u64,
    /// Display name
    pub name: String,
}

/// Parse the compact `"id:name,id:name"` favorites form.
///
/// Entries without a `:` or with a non-numeric id are skipped; surrounding
/// whitespace is trimmed.
pub fn parse_favorite_leagues(raw: &str) -> Vec<FavoriteLeague> {
    raw.split(',')
        .map(str::trim)
        .filter_map(|entry| {
            let (id, name) = entry.split_once(':')?;
            match id.trim().parse::<u64>() {
                Ok(id) => Some(FavoriteLeague {
                    id,
                    name: name.trim().to_string(),
                }),
                Err(e) => {
                    tracing::warn!(entry = %entry, error = %e, "Skipping favorite league with invalid id");
                    None
                }
            }
        })
        .collect()
}

/// Request body for `POST /process` and `POST /leaderboard`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// 1-based gameweek
    pub gameweek: u32,
    /// Classic league id
    pub league_id: u64,
}

/// Successful response of `POST /process`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProcessResponse {
    /// Always "completed"
    pub status: String,
    /// Requested gameweek
    pub gameweek: u32,
    /// Requested league
    pub league_id: u64,
    /// Ranked rows
    pub leaderboard: Vec<LeaderboardRow>,
    /// Number of rows in `leaderboard`
    pub total_managers: usize,
    /// Members processed, including those without a row
    pub processed_managers: usize,
}

impl From<Leaderboard> for ProcessResponse {
    fn from(board: Leaderboard) -> Self {
        Self {
            status: "completed".to_string(),
            gameweek: board.gameweek,
            league_id: board.league_id.0,
            total_managers: board.rows.len(),
            processed_managers: board.processed,
            leaderboard: board.rows,
        }
    }
}

/// Worker health report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WorkerHealth {
    /// "ok" when serving
    pub status: String,
    /// Free-form description
    pub message: String,
    /// Configured concurrency cap
    pub max_workers: usize,
    /// Crate version
    pub version: String,
}

/// Event emitted while a leaderboard is computed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// League collection started
    LeagueCollectionStarted {
        /// League being collected
        league_id: LeagueId,
        /// Requested gameweek
        gameweek: u32,
    },

    /// One standings page was fetched
    PageFetched {
        /// League being collected
        league_id: LeagueId,
        /// Page number
        page: u32,
        /// Members on the page
        members: usize,
    },

    /// League collection finished with members
    LeagueCollected {
        /// League collected
        league_id: LeagueId,
        /// Members collected
        total_members: usize,
    },

    /// Periodic aggregation progress
    MemberProgress {
        /// League being aggregated
        league_id: LeagueId,
        /// Members processed so far
        processed: usize,
        /// Members in the batch
        total: usize,
    },

    /// Leaderboard ranked and ready
    LeaderboardComplete {
        /// League
        league_id: LeagueId,
        /// Requested gameweek
        gameweek: u32,
        /// Rows produced
        rows: usize,
        /// Members processed
        processed: usize,
        /// Members collected
        total: usize,
        /// Completion time
        #[schema(value_type = String)]
        completed_at: DateTime<Utc>,
    },

    /// Leaderboard could not be produced
    LeaderboardFailed {
        /// League
        league_id: LeagueId,
        /// Requested gameweek
        gameweek: u32,
        /// Failure description
        message: String,
    },
}

impl Event {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            Event::LeagueCollectionStarted { .. } => "league_collection_started",
            Event::PageFetched { .. } => "page_fetched",
            Event::LeagueCollected { .. } => "league_collected",
            Event::MemberProgress { .. } => "member_progress",
            Event::LeaderboardComplete { .. } => "leaderboard_complete",
            Event::LeaderboardFailed { .. } => "leaderboard_failed",
        }
    }
}
