//! Member aggregation: fetch every member's history under a concurrency cap
//! and turn the requested gameweek into leaderboard rows.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};
use tokio::sync::broadcast;

use crate::source::FantasySource;
use crate::types::{Event, FetchOutcome, LeaderboardRow, LeagueId, StandingsEntry};

/// Parameters for aggregating a league's members
pub(crate) struct AggregateMembersParams<'a> {
    pub(crate) league_id: LeagueId,
    pub(crate) members: Vec<StandingsEntry>,
    pub(crate) gameweek: u32,
    /// Maximum member tasks in flight
    pub(crate) concurrency: usize,
    /// Report progress every N processed members
    pub(crate) progress_interval: usize,
    pub(crate) source: &'a Arc<dyn FantasySource>,
    pub(crate) event_tx: &'a broadcast::Sender<Event>,
}

/// Aborts a spawned member task when its awaiting future is dropped early
struct AbortOnDrop(tokio::task::AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Rows produced by a batch plus how many members were processed
pub(crate) struct AggregationOutcome {
    /// Rows in completion order (unranked)
    pub(crate) rows: Vec<LeaderboardRow>,
    /// Members processed, with or without a row
    pub(crate) processed: usize,
}

/// Build the leaderboard row for one member, if the member has one.
///
/// Returns `None` when the standings entry is malformed, when the history is
/// unavailable, or when it does not reach the requested gameweek. None of
/// these is an error.
pub(crate) async fn member_row(
    source: &dyn FantasySource,
    entry: &StandingsEntry,
    gameweek: u32,
) -> Option<LeaderboardRow> {
    let member = match entry.decode() {
        Ok(member) => member,
        Err(e) => {
            tracing::warn!(
                team_id = ?entry.team_id(),
                error = %e,
                "Malformed standings entry, skipping member"
            );
            return None;
        }
    };

    let history = match source.manager_history(member.team_id).await {
        FetchOutcome::Available(history) => history,
        FetchOutcome::Unavailable => {
            tracing::debug!(team_id = %member.team_id, "History unavailable, skipping member");
            return None;
        }
    };

    if history.len() < gameweek as usize {
        tracing::debug!(
            team_id = %member.team_id,
            records = history.len(),
            gameweek,
            "History shorter than requested gameweek, skipping member"
        );
        return None;
    }

    history
        .gameweek(gameweek)
        .map(|record| LeaderboardRow::new(&member, record))
}

/// Aggregate all members with at most `concurrency` history fetches in flight.
///
/// Each member runs in its own spawned task, so a panic while processing one
/// member surfaces as a join error for that member only and yields no row.
/// Tasks are spawned lazily by the buffered stream, which is what bounds the
/// number in flight.
///
/// Dropping the returned future (a caller that gave up) aborts every member
/// task already spawned; none outlives the aggregation.
pub(crate) async fn aggregate_members(params: AggregateMembersParams<'_>) -> AggregationOutcome {
    let AggregateMembersParams {
        league_id,
        members,
        gameweek,
        concurrency,
        progress_interval,
        source,
        event_tx,
    } = params;

    let total = members.len();
    let processed = Arc::new(AtomicUsize::new(0));
    let progress_interval = progress_interval.max(1);

    let results: Vec<Option<LeaderboardRow>> = stream::iter(members)
        .map(|entry| {
            let team_id = entry.team_id();
            let source = Arc::clone(source);
            let processed = Arc::clone(&processed);
            let event_tx = event_tx.clone();

            let handle =
                tokio::spawn(async move { member_row(source.as_ref(), &entry, gameweek).await });
            let abort_on_drop = AbortOnDrop(handle.abort_handle());

            async move {
                let row = match handle.await {
                    Ok(row) => row,
                    Err(e) => {
                        tracing::error!(team_id = ?team_id, error = %e, "Member task failed");
                        None
                    }
                };
                drop(abort_on_drop);

                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % progress_interval == 0 {
                    tracing::info!(
                        league_id = %league_id,
                        processed = done,
                        total,
                        percent = done * 100 / total.max(1),
                        "Aggregation progress"
                    );
                    event_tx
                        .send(Event::MemberProgress {
                            league_id,
                            processed: done,
                            total,
                        })
                        .ok();
                }

                row
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    AggregationOutcome {
        rows: results.into_iter().flatten().collect(),
        processed: processed.load(Ordering::Relaxed),
    }
}
