//! Proxy server demo
//!
//! Forwards leaderboard requests to a worker and reports its health.
//!
//! ```text
//! cargo run --example proxy_server [config.json]
//! ```
//!
//! `WORKER_URL`, `DEFAULT_LEAGUE_ID` and `FAVORITE_LEAGUES` ("id:name,id:name")
//! override the corresponding config values.

use gw_leaderboard::proxy::start_proxy_server;
use gw_leaderboard::{Config, parse_favorite_leagues, shutdown_on_signal};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if let Ok(url) = std::env::var("WORKER_URL") {
        config.proxy.worker_url = url;
    }
    if let Ok(id) = std::env::var("DEFAULT_LEAGUE_ID") {
        config.proxy.default_league_id = id.parse()?;
    }
    if let Ok(raw) = std::env::var("FAVORITE_LEAGUES") {
        config.proxy.favorite_leagues = parse_favorite_leagues(&raw);
    }
    config.validate()?;

    println!(
        "Proxy listening on http://{} -> worker {}",
        config.proxy.bind_address, config.proxy.worker_url
    );

    start_proxy_server(Arc::new(config), shutdown_on_signal()).await?;
    Ok(())
}
