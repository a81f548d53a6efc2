//! Leaderboard processing handler.

use crate::api::AppState;
use crate::api::error_response::simple_error_response;
use crate::error::Error;
use crate::types::{LeagueId, ProcessRequest, ProcessResponse};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /process - Compute a gameweek leaderboard
///
/// Blocks until the whole league has been aggregated. A league that yields no
/// members answers 400 with `{"error": "Failed to fetch league data"}`.
#[utoipa::path(
    post,
    path = "/process",
    tag = "leaderboard",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Leaderboard computed", body = ProcessResponse),
        (status = 400, description = "League data could not be fetched or the body is malformed", body = crate::error::SimpleError),
        (status = 500, description = "Internal server error", body = crate::error::SimpleError)
    )
)]
pub async fn process(
    State(state): State<AppState>,
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

    tracing::info!(
        gameweek = request.gameweek,
        league_id = request.league_id,
        "Received leaderboard request"
    );

    match state
        .engine
        .compute_leaderboard(LeagueId(request.league_id), request.gameweek)
        .await
    {
        Ok(board) => {
            let response = ProcessResponse::from(board);
            tracing::info!(
                league_id = response.league_id,
                rows = response.total_managers,
                processed = response.processed_managers,
                "Returning leaderboard"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::warn!(
                league_id = request.league_id,
                gameweek = request.gameweek,
                error = %e,
                "Leaderboard request failed"
            );
            simple_error_response(&e)
        }
    }
}
