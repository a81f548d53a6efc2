//! Proxy route handlers.

use super::{ProxyHealth, ProxyState, favorite_leagues};
use crate::api::error_response::simple_error_response;
use crate::error::Error;
use crate::types::{FavoriteLeague, ProcessRequest, ProcessResponse};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /leaderboard - Forward a leaderboard request to the worker
#[utoipa::path(
    post,
    path = "/leaderboard",
    tag = "leaderboard",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Leaderboard computed by the worker", body = ProcessResponse),
        (status = 400, description = "League data could not be fetched or the body is malformed", body = crate::error::SimpleError),
        (status = 503, description = "Worker not reachable", body = crate::error::SimpleError),
        (status = 504, description = "Worker timed out", body = crate::error::SimpleError)
    )
)]
pub async fn get_leaderboard(
    State(state): State<ProxyState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let error = Error::from(rejection);
            tracing::warn!(error = %error, "Rejected malformed leaderboard request");
            return simple_error_response(&error);
        }
    };

    let started = chrono::Local::now();
    tracing::info!(
        gameweek = request.gameweek,
        league_id = request.league_id,
        received_at = %started.format("%Y-%m-%d %H:%M:%S"),
        "Received leaderboard request"
    );

    match state
        .client
        .leaderboard(request.league_id, request.gameweek)
        .await
    {
        Ok(response) => {
            let elapsed = chrono::Local::now() - started;
            tracing::info!(
                league_id = response.league_id,
                rows = response.total_managers,
                elapsed_ms = elapsed.num_milliseconds(),
                "Leaderboard returned to client"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => simple_error_response(&e),
    }
}

/// GET /health - Proxy health including worker reachability
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Proxy is running; worker reachability in the body", body = ProxyHealth)
    )
)]
pub async fn proxy_health(State(state): State<ProxyState>) -> Json<ProxyHealth> {
    Json(state.client.health().await)
}

/// GET /favorite-leagues - Leagues offered for quick selection
#[utoipa::path(
    get,
    path = "/favorite-leagues",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Default league first, then configured favorites", body = Vec<FavoriteLeague>)
    )
)]
pub async fn list_favorite_leagues(State(state): State<ProxyState>) -> Json<Vec<FavoriteLeague>> {
    Json(favorite_leagues(&state.config.proxy))
}
