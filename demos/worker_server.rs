//! Worker server demo
//!
//! Runs the leaderboard engine behind `POST /process`.
//!
//! ```text
//! cargo run --example worker_server [config.json]
//! ```
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:5001/swagger-ui
//! - Compute a leaderboard via POST http://localhost:5001/process
//!   with `{"gameweek": 5, "league_id": 208271}`
//! - Stream progress via GET http://localhost:5001/events

use gw_leaderboard::api::start_api_server;
use gw_leaderboard::{Config, LeaderboardEngine, shutdown_on_signal};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    let engine = Arc::new(LeaderboardEngine::new(config.clone())?);
    let config = Arc::new(config);

    println!(
        "Worker listening on http://{} (max {} concurrent fetches)",
        config.server.api.bind_address,
        engine.max_concurrent_fetches()
    );

    start_api_server(engine, config, shutdown_on_signal()).await?;
    Ok(())
}
