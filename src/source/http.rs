//! HTTP implementation of [`FantasySource`] backed by reqwest.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::RemoteConfig;
use crate::error::Result;
use crate::types::{
    FetchOutcome, LeagueId, LeagueStandingsPage, ManagerHistory, StandingsResponse, TeamId,
};

use super::FantasySource;

/// Client for the fantasy API
///
/// Holds one pooled `reqwest::Client`; cloning shares the pool.
#[derive(Debug, Clone)]
pub struct FplClient {
    client: reqwest::Client,
    base_url: String,
}

impl FplClient {
    /// Build a client from remote settings
    ///
    /// The per-request timeout applies to every page and history fetch.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self { client, base_url })
    }

    /// Base URL with trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn standings_url(&self, league_id: LeagueId, page: u32) -> String {
        format!(
            "{}leagues-classic/{}/standings/?page_standings={}",
            self.base_url, league_id, page
        )
    }

    fn history_url(&self, team_id: TeamId) -> String {
        format!("{}entry/{}/history/", self.base_url, team_id)
    }

    /// GET a JSON document, collapsing every failure to `Unavailable`
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> FetchOutcome<T> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Remote request failed");
                return FetchOutcome::Unavailable;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Remote request returned non-success status");
            return FetchOutcome::Unavailable;
        }

        match response.json::<T>().await {
            Ok(body) => FetchOutcome::Available(body),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Remote response could not be decoded");
                FetchOutcome::Unavailable
            }
        }
    }
}

#[async_trait]
impl FantasySource for FplClient {
    async fn standings_page(
        &self,
        league_id: LeagueId,
        page: u32,
    ) -> FetchOutcome<LeagueStandingsPage> {
        let url = self.standings_url(league_id, page);
        match self.get_json::<StandingsResponse>(&url).await {
            FetchOutcome::Available(body) => FetchOutcome::Available(body.into_page(page)),
            FetchOutcome::Unavailable => FetchOutcome::Unavailable,
        }
    }

    async fn manager_history(&self, team_id: TeamId) -> FetchOutcome<ManagerHistory> {
        let url = self.history_url(team_id);
        self.get_json(&url).await
    }
}
