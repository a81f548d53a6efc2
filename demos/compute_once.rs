//! One-shot leaderboard computation
//!
//! ```text
//! cargo run --example compute_once -- <league_id> <gameweek>
//! ```

use gw_leaderboard::{Config, Event, LeaderboardEngine, LeagueId};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (Some(league_id), Some(gameweek)) = (args.next(), args.next()) else {
        eprintln!("usage: compute_once <league_id> <gameweek>");
        std::process::exit(2);
    };
    let league_id = LeagueId(league_id.parse()?);
    let gameweek: u32 = gameweek.parse()?;

    let engine = LeaderboardEngine::new(Config::default())?;

    let mut events = engine.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let Event::MemberProgress {
                processed, total, ..
            } = event
            {
                println!("  {processed}/{total} managers processed");
            }
        }
    });

    let board = engine.compute_leaderboard(league_id, gameweek).await?;

    println!(
        "League {} gameweek {}: {} rows from {} managers",
        board.league_id,
        board.gameweek,
        board.row_count(),
        board.processed
    );
    for (position, row) in board.rows.iter().enumerate() {
        println!(
            "{:>4}. {:<30} {:<25} {:>3} (-{}) = {:>3}",
            position + 1,
            row.team_name(),
            row.manager_name(),
            row.gw_points(),
            row.transfer_cost(),
            row.net_points()
        );
    }
    Ok(())
}
