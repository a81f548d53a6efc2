//! Final ordering of leaderboard rows.

use crate::types::LeaderboardRow;

/// Sort rows by gameweek points, highest first.
///
/// The sort is stable: rows with equal points keep their incoming order.
/// Since rows arrive in task completion order, ties are not reproducible
/// across runs.
pub fn rank_rows(mut rows: Vec<LeaderboardRow>) -> Vec<LeaderboardRow> {
    rows.sort_by(|a, b| b.gw_points().cmp(&a.gw_points()));
    rows
}
