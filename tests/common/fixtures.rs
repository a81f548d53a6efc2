//! A wiremock stand-in for the fantasy API

use gw_leaderboard::Config;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One standings entry: (team id, manager name, team name)
pub type Entry<'a> = (u64, &'a str, &'a str);

/// Fake fantasy API served from a local mock server
pub struct FakeFpl {
    pub server: MockServer,
}

impl FakeFpl {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to put in `remote.base_url`
    pub fn api_url(&self) -> String {
        format!("{}/api/", self.server.uri())
    }

    /// Serve one standings page
    pub async fn standings_page(&self, league_id: u64, page: u32, entries: &[Entry<'_>], has_next: bool) {
        let results: Vec<serde_json::Value> = entries
            .iter()
            .enumerate()
            .map(|(i, (team_id, manager, team))| {
                serde_json::json!({
                    "id": team_id * 100,
                    "event_total": 0,
                    "player_name": manager,
                    "rank": i + 1,
                    "last_rank": i + 1,
                    "rank_sort": i + 1,
                    "total": 1000 - i as i64,
                    "entry": team_id,
                    "entry_name": team
                })
            })
            .collect();

        self.raw_standings_page(league_id, page, results, has_next)
            .await;
    }

    /// Serve one standings page whose entries are sent exactly as given
    pub async fn raw_standings_page(
        &self,
        league_id: u64,
        page: u32,
        results: Vec<serde_json::Value>,
        has_next: bool,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/api/leagues-classic/{league_id}/standings/")))
            .and(query_param("page_standings", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "league": {"id": league_id, "name": "Test League"},
                "standings": {"has_next": has_next, "page": page, "results": results}
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer every request for a standings page with `status`
    pub async fn standings_status(&self, league_id: u64, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/api/leagues-classic/{league_id}/standings/")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Serve a history with one `(points, transfer_cost)` pair per gameweek
    pub async fn history(&self, team_id: u64, gameweeks: &[(i64, i64)]) {
        let current: Vec<serde_json::Value> = gameweeks
            .iter()
            .enumerate()
            .map(|(i, (points, cost))| {
                serde_json::json!({
                    "event": i + 1,
                    "points": points,
                    "total_points": 0,
                    "rank": 1,
                    "event_transfers": cost / 4,
                    "event_transfers_cost": cost,
                    "points_on_bench": 0
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(format!("/api/entry/{team_id}/history/")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": current,
                "past": [],
                "chips": []
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer the history request for `team_id` with `status`
    pub async fn history_status(&self, team_id: u64, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/api/entry/{team_id}/history/")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Serve a history only after `delay`
    pub async fn slow_history(&self, team_id: u64, gameweeks: &[(i64, i64)], delay: Duration) {
        let current: Vec<serde_json::Value> = gameweeks
            .iter()
            .enumerate()
            .map(|(i, (points, cost))| {
                serde_json::json!({"event": i + 1, "points": points, "event_transfers_cost": cost})
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(format!("/api/entry/{team_id}/history/")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"current": current}))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }
}

/// Config pointing the engine at `fpl` with a short per-call timeout
pub fn config_for(fpl: &FakeFpl, concurrency: usize) -> Config {
    let mut config = Config::default();
    config.remote.base_url = fpl.api_url();
    config.remote.request_timeout = Duration::from_secs(2);
    config.aggregation.max_concurrent_fetches = concurrency;
    config
}
