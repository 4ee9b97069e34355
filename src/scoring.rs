// Fantasy point scoring.
//
// Converts a player's raw season stat line into a fantasy point total via a
// linear weighted sum. Pure and total: missing stat categories are zero in
// `PlayerStats`, and no input validation is performed.

use crate::catalog::{PlayerStats, Position};

/// Round to one decimal place, half away from zero.
pub fn round_to_tenth(points: f64) -> f64 {
    (points * 10.0).round() / 10.0
}

/// Compute the fantasy point total for a stat line.
///
/// Common scoring (all positions):
/// - passing yards x 0.025, passing TDs x 4
/// - rushing/receiving yards x 0.1, rushing/receiving TDs x 6
/// - receptions x 1
/// - fumbles and interceptions thrown x -2
///
/// Kickers add extra points x 1 and field goals x 3. Defenses add sacks and
/// interceptions x 2, and lose 3 per touchdown allowed and 3 per full 150
/// yards allowed.
pub fn fantasy_points(position: Position, stats: &PlayerStats) -> f64 {
    let mut points = 0.0;

    points += stats.passing_yards as f64 * 0.025;
    points += stats.rushing_yards as f64 * 0.1;
    points += stats.receiving_yards as f64 * 0.1;
    points += stats.receptions as f64 * 1.0;
    points += stats.passing_tds as f64 * 4.0;
    points += stats.rushing_tds as f64 * 6.0;
    points += stats.receiving_tds as f64 * 6.0;
    points -= stats.fumbles as f64 * 2.0;
    points -= stats.interceptions as f64 * 2.0;

    if position == Position::K {
        points += stats.extra_points_made as f64 * 1.0;
        points += stats.field_goals_made as f64 * 3.0;
    }

    if position == Position::DEF {
        points += stats.sacks as f64 * 2.0;
        points += stats.def_interceptions as f64 * 2.0;
        points -= stats.touchdowns_allowed as f64 * 3.0;
        points -= (stats.yards_allowed / 150) as f64 * 3.0;
    }

    round_to_tenth(points)
}

/// Per-game average, rounded to one decimal. Zero when no games were played.
pub fn points_per_game(total_points: f64, games_played: u32) -> f64 {
    if games_played == 0 {
        return 0.0;
    }
    round_to_tenth(total_points / games_played as f64)
}
