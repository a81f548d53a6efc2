use super::test_helpers::{HistoryBehavior, MockSource, engine_with, history, member};
use super::*;
use crate::types::{GameweekRecord, ManagerHistory, TeamId};
use std::time::Duration;

#[tokio::test]
async fn three_member_scenario_produces_single_row() {
    let gw3_history = ManagerHistory {
        current: vec![
            GameweekRecord {
                gameweek: 1,
                points: 40,
                transfer_cost: 0,
            },
            GameweekRecord {
                gameweek: 2,
                points: 51,
                transfer_cost: 0,
            },
            GameweekRecord {
                gameweek: 3,
                points: 60,
                transfer_cost: 4,
            },
            GameweekRecord {
                gameweek: 4,
                points: 70,
                transfer_cost: 0,
            },
            GameweekRecord {
                gameweek: 5,
                points: 33,
                transfer_cost: 8,
            },
        ],
    };

    let source = Arc::new(
        MockSource::new()
            .with_page(1, vec![member(1), member(2), member(3)], false)
            .with_history(1, HistoryBehavior::Available(gw3_history))
            .with_history(2, HistoryBehavior::Available(history(2, 50)))
            .with_history(3, HistoryBehavior::Unavailable),
    );
    let engine = engine_with(source.clone(), 20);

    let board = engine.compute_leaderboard(LeagueId(1), 3).await.unwrap();

    assert_eq!(board.row_count(), 1);
    assert_eq!(board.processed, 3);
    assert_eq!(board.total_members, 3);

    let row = &board.rows[0];
    assert_eq!(row.team_id(), TeamId(1));
    assert_eq!(row.gw_points(), 60);
    assert_eq!(row.transfer_cost(), 4);
    assert_eq!(row.net_points(), 56);
    assert_eq!(source.history_calls(), 3);
}

#[tokio::test]
async fn pagination_stops_when_has_next_is_false() {
    let source = Arc::new(
        MockSource::new()
            .with_page(1, vec![member(1), member(2)], true)
            .with_page(2, vec![member(3)], false)
            .with_page(3, vec![member(4)], false),
    );
    let engine = engine_with(source.clone(), 4);

    let board = engine.compute_leaderboard(LeagueId(9), 1).await.unwrap();

    assert_eq!(source.requested_pages(), vec![1, 2]);
    assert_eq!(board.total_members, 3);
}

#[tokio::test]
async fn pagination_stops_on_empty_page() {
    let source = Arc::new(
        MockSource::new()
            .with_page(1, vec![member(1)], true)
            .with_page(2, vec![], true)
            .with_page(3, vec![member(3)], false),
    );
    let engine = engine_with(source.clone(), 4);

    let board = engine.compute_leaderboard(LeagueId(9), 1).await.unwrap();

    assert_eq!(source.requested_pages(), vec![1, 2]);
    assert_eq!(board.total_members, 1);
}

#[tokio::test]
async fn pagination_stops_on_unavailable_page_and_keeps_earlier_members() {
    let source = Arc::new(
        MockSource::new()
            .with_page(1, vec![member(1), member(2)], true)
            .with_unavailable_page(2)
            .with_page(3, vec![member(3)], false)
            .with_history(1, HistoryBehavior::Available(history(1, 10)))
            .with_history(2, HistoryBehavior::Available(history(1, 20))),
    );
    let engine = engine_with(source.clone(), 4);

    let board = engine.compute_leaderboard(LeagueId(9), 1).await.unwrap();

    assert_eq!(source.requested_pages(), vec![1, 2]);
    assert_eq!(board.total_members, 2);
    assert_eq!(board.row_count(), 2);
}

#[tokio::test]
async fn page_ceiling_stops_pagination() {
    let source = Arc::new(
        MockSource::new()
            .with_page(1, vec![member(1)], true)
            .with_page(2, vec![member(2)], true)
            .with_page(3, vec![member(3)], true),
    );
    let mut config = Config::default();
    config.aggregation.max_pages = Some(2);
    let engine = LeaderboardEngine::with_source(config, source.clone());

    let board = engine.compute_leaderboard(LeagueId(9), 1).await.unwrap();

    assert_eq!(source.requested_pages(), vec![1, 2]);
    assert_eq!(board.total_members, 2);
}

#[tokio::test]
async fn empty_first_page_is_league_fetch_failure() {
    let source = Arc::new(MockSource::new().with_page(1, vec![], false));
    let engine = engine_with(source.clone(), 4);

    let result = engine.compute_leaderboard(LeagueId(77), 1).await;

    match result {
        Err(Error::LeagueFetchFailed { league_id }) => assert_eq!(league_id, 77),
        other => panic!("expected LeagueFetchFailed, got {other:?}"),
    }
    assert_eq!(source.history_calls(), 0, "aggregation must not start");
}

#[tokio::test]
async fn unavailable_first_page_is_league_fetch_failure() {
    let source = Arc::new(MockSource::new().with_unavailable_page(1));
    let engine = engine_with(source, 4);

    let result = engine.compute_leaderboard(LeagueId(77), 1).await;
    assert!(matches!(result, Err(Error::LeagueFetchFailed { .. })));
}

#[tokio::test]
async fn duplicate_teams_across_pages_are_aggregated_once() {
    let source = Arc::new(
        MockSource::new()
            .with_page(1, vec![member(1), member(2)], true)
            .with_page(2, vec![member(2), member(3)], false)
            .with_history(1, HistoryBehavior::Available(history(1, 10)))
            .with_history(2, HistoryBehavior::Available(history(1, 20)))
            .with_history(3, HistoryBehavior::Available(history(1, 30))),
    );
    let engine = engine_with(source.clone(), 4);

    let board = engine.compute_leaderboard(LeagueId(9), 1).await.unwrap();

    assert_eq!(board.total_members, 3);
    assert_eq!(board.row_count(), 3);
    assert_eq!(source.history_calls(), 3);

    let mut ids: Vec<u64> = board.rows.iter().map(|r| r.team_id().0).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn concurrency_cap_is_respected_under_load() {
    let members: Vec<_> = (1..=200).map(member).collect();
    let mut source = MockSource::new()
        .with_page(1, members, false)
        .with_history_delay(Duration::from_millis(5));
    for team in 1..=200 {
        source = source.with_history(team, HistoryBehavior::Available(history(3, team as i64)));
    }
    let source = Arc::new(source);
    let engine = engine_with(source.clone(), 7);

    let board = engine.compute_leaderboard(LeagueId(1), 2).await.unwrap();

    assert_eq!(board.row_count(), 200);
    assert_eq!(board.processed, 200);
    assert!(
        source.max_in_flight() <= 7,
        "saw {} fetches in flight with a cap of 7",
        source.max_in_flight()
    );
    assert!(source.max_in_flight() > 1, "fetches should overlap");
}

#[tokio::test]
async fn panicking_member_does_not_sink_the_batch() {
    let source = Arc::new(
        MockSource::new()
            .with_page(1, vec![member(1), member(2), member(3)], false)
            .with_history(1, HistoryBehavior::Available(history(4, 10)))
            .with_history(2, HistoryBehavior::Panic)
            .with_history(3, HistoryBehavior::Available(history(4, 20))),
    );
    let engine = engine_with(source, 2);

    let board = engine.compute_leaderboard(LeagueId(1), 4).await.unwrap();

    assert_eq!(board.processed, 3);
    let ids: Vec<u64> = board.rows.iter().map(|r| r.team_id().0).collect();
    assert_eq!(ids, vec![3, 1]);
}

#[tokio::test]
async fn malformed_entry_skips_only_that_member() {
    let mut broken = serde_json::to_value(member(2)).unwrap();
    broken["player_name"] = serde_json::Value::Null;
    let source = Arc::new(
        MockSource::new()
            .with_raw_page(
                1,
                vec![serde_json::to_value(member(1)).unwrap(), broken],
                false,
            )
            .with_history(1, HistoryBehavior::Available(history(3, 10)))
            .with_history(2, HistoryBehavior::Available(history(3, 20))),
    );
    let engine = engine_with(source.clone(), 4);

    let board = engine.compute_leaderboard(LeagueId(1), 3).await.unwrap();

    assert_eq!(board.total_members, 2);
    assert_eq!(board.processed, 2);
    assert_eq!(board.row_count(), 1);
    assert_eq!(board.rows[0].team_id(), TeamId(1));
    // The malformed member never reaches the history fetch
    assert_eq!(source.history_calls(), 1);
}

#[tokio::test]
async fn malformed_entries_on_later_pages_keep_pagination_going() {
    let source = Arc::new(
        MockSource::new()
            .with_page(1, vec![member(1)], true)
            .with_raw_page(2, vec![serde_json::json!({"entry": 2})], true)
            .with_page(3, vec![member(3)], false)
            .with_history(1, HistoryBehavior::Available(history(1, 10)))
            .with_history(3, HistoryBehavior::Available(history(1, 30))),
    );
    let engine = engine_with(source.clone(), 4);

    let board = engine.compute_leaderboard(LeagueId(1), 1).await.unwrap();

    assert_eq!(source.requested_pages(), vec![1, 2, 3]);
    assert_eq!(board.total_members, 3);
    assert_eq!(board.processed, 3);
    let ids: Vec<u64> = board.rows.iter().map(|r| r.team_id().0).collect();
    assert_eq!(ids, vec![3, 1]);
}

#[tokio::test]
async fn dropping_the_computation_aborts_member_tasks() {
    let mut source = MockSource::new()
        .with_page(1, (1..=10).map(member).collect(), false)
        .with_history_delay(Duration::from_secs(30));
    for team in 1..=10 {
        source = source.with_history(team, HistoryBehavior::Available(history(1, 0)));
    }
    let source = Arc::new(source);
    let engine = engine_with(source.clone(), 4);

    let gave_up =
        tokio::time::timeout(Duration::from_millis(100), engine.compute_leaderboard(LeagueId(1), 1))
            .await;
    assert!(gave_up.is_err());
    assert_eq!(source.max_in_flight(), 4);

    for _ in 0..50 {
        if source.in_flight() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(source.in_flight(), 0, "member tasks outlived the computation");
}

#[tokio::test]
async fn rows_are_ranked_and_net_points_are_consistent() {
    let mut source = MockSource::new().with_page(1, (1..=30).map(member).collect(), false);
    for team in 1..=30u64 {
        let records = (1..=5)
            .map(|gw| GameweekRecord {
                gameweek: gw,
                points: ((team * 37 + gw as u64 * 11) % 90) as i64,
                transfer_cost: (team % 3 * 4) as i64,
            })
            .collect();
        source = source.with_history(
            team,
            HistoryBehavior::Available(ManagerHistory { current: records }),
        );
    }
    let engine = engine_with(Arc::new(source), 5);

    let board = engine.compute_leaderboard(LeagueId(1), 5).await.unwrap();

    assert_eq!(board.row_count(), 30);
    for row in &board.rows {
        assert_eq!(row.net_points(), row.gw_points() - row.transfer_cost());
    }
    for pair in board.rows.windows(2) {
        assert!(pair[0].gw_points() >= pair[1].gw_points());
    }
    assert_eq!(rank_rows(board.rows.clone()), board.rows);
}

#[tokio::test]
async fn row_count_matches_members_with_enough_history() {
    let mut source = MockSource::new().with_page(1, (1..=10).map(member).collect(), false);
    // Teams 1..=10 have `team` gameweeks of history
    for team in 1..=10u64 {
        source = source.with_history(
            team,
            HistoryBehavior::Available(history(team as u32, 0)),
        );
    }
    let engine = engine_with(Arc::new(source), 3);

    let board = engine.compute_leaderboard(LeagueId(1), 6).await.unwrap();

    assert_eq!(board.row_count(), 5);
    assert_eq!(board.processed, 10);
    assert!(board.rows.iter().all(|r| r.team_id().0 >= 6));
}

#[tokio::test]
async fn gameweek_zero_yields_no_rows() {
    let source = Arc::new(
        MockSource::new()
            .with_page(1, vec![member(1)], false)
            .with_history(1, HistoryBehavior::Available(history(3, 0))),
    );
    let engine = engine_with(source, 2);

    let board = engine.compute_leaderboard(LeagueId(1), 0).await.unwrap();
    assert_eq!(board.row_count(), 0);
    assert_eq!(board.processed, 1);
}

#[tokio::test]
async fn events_report_progress_and_completion() {
    let mut source = MockSource::new().with_page(1, (1..=120).map(member).collect(), false);
    for team in 1..=120u64 {
        source = source.with_history(team, HistoryBehavior::Available(history(1, 0)));
    }
    let engine = engine_with(Arc::new(source), 10);
    let mut events = engine.subscribe();

    engine.compute_leaderboard(LeagueId(3), 1).await.unwrap();

    let mut progress = Vec::new();
    let mut completed = None;
    while let Ok(event) = events.try_recv() {
        match event {
            Event::MemberProgress {
                processed, total, ..
            } => {
                assert_eq!(total, 120);
                progress.push(processed);
            }
            Event::LeaderboardComplete {
                rows, processed, ..
            } => completed = Some((rows, processed)),
            _ => {}
        }
    }

    assert_eq!(progress, vec![50, 100]);
    assert_eq!(completed, Some((120, 120)));
}

#[tokio::test]
async fn failure_emits_failed_event() {
    let source = Arc::new(MockSource::new().with_unavailable_page(1));
    let engine = engine_with(source, 2);
    let mut events = engine.subscribe();

    let _ = engine.compute_leaderboard(LeagueId(5), 2).await;

    let mut saw_failure = false;
    while let Ok(event) = events.try_recv() {
        if let Event::LeaderboardFailed { league_id, .. } = event {
            assert_eq!(league_id, LeagueId(5));
            saw_failure = true;
        }
        assert!(!matches!(event, Event::LeagueCollected { .. }));
    }
    assert!(saw_failure);
}

#[test]
fn stage_display_names() {
    assert_eq!(Stage::CollectingLeague.to_string(), "collecting_league");
    assert_eq!(Stage::AggregatingMembers.to_string(), "aggregating_members");
    assert_eq!(Stage::Ranked.to_string(), "ranked");
}

#[test]
fn new_rejects_invalid_config() {
    let mut config = Config::default();
    config.aggregation.max_concurrent_fetches = 0;
    assert!(LeaderboardEngine::new(config).is_err());
}
