//! League collection: walk standings pages until the server says stop.

use std::collections::HashSet;

use tokio::sync::broadcast;

use crate::source::FantasySource;
use crate::types::{Event, FetchOutcome, LeagueId, StandingsEntry};

/// Collect every member of a league by following standings pagination.
///
/// Pages are fetched strictly in order starting at 1. Collection stops when a
/// page is unavailable, when a page lists no members, when the page reports
/// no continuation, or when `max_pages` pages have been read. Entries already
/// seen on an earlier page (same team id) are dropped. Entries without a
/// readable team id are kept; they are decoded, and skipped, per member.
///
/// Returns the accumulated members, possibly empty. An empty result is the
/// caller's signal that the league could not be fetched.
pub(crate) async fn collect_league(
    source: &dyn FantasySource,
    league_id: LeagueId,
    max_pages: Option<u32>,
    event_tx: &broadcast::Sender<Event>,
) -> Vec<StandingsEntry> {
    let mut members: Vec<StandingsEntry> = Vec::new();
    let mut seen = HashSet::new();
    let mut page_number: u32 = 1;

    loop {
        let page = match source.standings_page(league_id, page_number).await {
            FetchOutcome::Available(page) => page,
            FetchOutcome::Unavailable => {
                tracing::debug!(
                    league_id = %league_id,
                    page = page_number,
                    "Standings page unavailable, stopping pagination"
                );
                break;
            }
        };

        if page.results.is_empty() {
            break;
        }

        let page_len = page.results.len();
        for entry in page.results {
            match entry.team_id() {
                Some(team_id) if !seen.insert(team_id) => {
                    tracing::debug!(
                        league_id = %league_id,
                        team_id = %team_id,
                        "Duplicate team in standings, keeping first occurrence"
                    );
                }
                _ => members.push(entry),
            }
        }

        tracing::info!(
            league_id = %league_id,
            page = page_number,
            teams = page_len,
            "Fetched standings page"
        );
        event_tx
            .send(Event::PageFetched {
                league_id,
                page: page_number,
                members: page_len,
            })
            .ok();

        if !page.has_next {
            break;
        }

        if max_pages.is_some_and(|max| page_number >= max) {
            tracing::warn!(
                league_id = %league_id,
                max_pages = page_number,
                "Standings page ceiling reached, stopping pagination"
            );
            break;
        }

        page_number += 1;
    }

    members
}
