// Player catalog: positions, season stat lines, and derived fields.
//
// Players are immutable reference data for a season. The catalog is loaded
// once from CSV and annotated with derived values (fantasy points, per-game
// average, salary); the engine only ever reads player records after that.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::salary;
use crate::scoring;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Football roster positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
}

impl Position {
    /// All positions in roster capacity-table order. The random roster
    /// generators fill slots in this order.
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::WR,
        Position::RB,
        Position::TE,
        Position::DEF,
        Position::K,
    ];

    /// Parse a position string (case-insensitive).
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            "K" => Some(Position::K),
            "DEF" | "DST" => Some(Position::DEF),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DEF => "DEF",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// PlayerStats
// ---------------------------------------------------------------------------

/// Sparse per-category season totals. Categories a player never touches
/// (e.g. kicking stats for a running back) default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    // Passing
    pub pass_attempts: u32,
    pub pass_completions: u32,
    pub passing_yards: u32,
    pub passing_tds: u32,
    pub interceptions: u32,
    // Rushing
    pub rush_attempts: u32,
    pub rushing_yards: u32,
    pub rushing_tds: u32,
    // Receiving
    pub receptions: u32,
    pub receiving_yards: u32,
    pub receiving_tds: u32,
    // Turnovers
    pub fumbles: u32,
    // Kicking
    pub kick_attempts: u32,
    pub kicks_made: u32,
    pub extra_points_made: u32,
    pub field_goals_made: u32,
    // Defense
    pub points_allowed: u32,
    pub yards_allowed: u32,
    pub sacks: u32,
    pub def_interceptions: u32,
    pub safeties: u32,
    pub touchdowns_allowed: u32,
}

impl PlayerStats {
    /// Completion percentage, derived on demand from attempts/completions.
    /// `None` when the player has no pass attempts.
    pub fn passing_pct(&self) -> Option<f64> {
        if self.pass_attempts == 0 {
            return None;
        }
        Some(self.pass_completions as f64 / self.pass_attempts as f64 * 100.0)
    }

    /// Field goal percentage, derived on demand. `None` when the player has
    /// no kick attempts.
    pub fn kicking_pct(&self) -> Option<f64> {
        if self.kick_attempts == 0 {
            return None;
        }
        Some(self.kicks_made as f64 / self.kick_attempts as f64 * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A catalog player: identity, raw season stats, and the derived fields
/// computed once at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub team: String,
    pub games_played: u32,
    pub stats: PlayerStats,
    /// Season fantasy point total, rounded to one decimal.
    pub fantasy_points: f64,
    /// Per-game fantasy point average, rounded to one decimal.
    pub fantasy_points_per_game: f64,
    /// Draft salary in currency units, always a multiple of 100.
    pub salary: u32,
}

impl Player {
    /// Build a player from raw identity + stats, computing all derived fields.
    pub fn from_stats(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        team: impl Into<String>,
        games_played: u32,
        stats: PlayerStats,
    ) -> Self {
        let fantasy_points = scoring::fantasy_points(position, &stats);
        let fantasy_points_per_game = scoring::points_per_game(fantasy_points, games_played);
        let salary = salary::salary_for(position, fantasy_points_per_game);
        Player {
            id: id.into(),
            name: name.into(),
            position,
            team: team.into(),
            games_played,
            stats,
            fantasy_points,
            fantasy_points_per_game,
            salary,
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

/// One row of the player catalog CSV. Fully flat so the `csv` crate can
/// deserialize it directly; converted into a nested `Player` afterwards.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogRow {
    id: String,
    name: String,
    position: String,
    team: String,
    games_played: u32,
    pass_attempts: u32,
    pass_completions: u32,
    passing_yards: u32,
    passing_tds: u32,
    interceptions: u32,
    rush_attempts: u32,
    rushing_yards: u32,
    rushing_tds: u32,
    receptions: u32,
    receiving_yards: u32,
    receiving_tds: u32,
    fumbles: u32,
    kick_attempts: u32,
    kicks_made: u32,
    extra_points_made: u32,
    field_goals_made: u32,
    points_allowed: u32,
    yards_allowed: u32,
    sacks: u32,
    def_interceptions: u32,
    safeties: u32,
    touchdowns_allowed: u32,
}

impl CatalogRow {
    fn stats(&self) -> PlayerStats {
        PlayerStats {
            pass_attempts: self.pass_attempts,
            pass_completions: self.pass_completions,
            passing_yards: self.passing_yards,
            passing_tds: self.passing_tds,
            interceptions: self.interceptions,
            rush_attempts: self.rush_attempts,
            rushing_yards: self.rushing_yards,
            rushing_tds: self.rushing_tds,
            receptions: self.receptions,
            receiving_yards: self.receiving_yards,
            receiving_tds: self.receiving_tds,
            fumbles: self.fumbles,
            kick_attempts: self.kick_attempts,
            kicks_made: self.kicks_made,
            extra_points_made: self.extra_points_made,
            field_goals_made: self.field_goals_made,
            points_allowed: self.points_allowed,
            yards_allowed: self.yards_allowed,
            sacks: self.sacks,
            def_interceptions: self.def_interceptions,
            safeties: self.safeties,
            touchdowns_allowed: self.touchdowns_allowed,
        }
    }
}

/// Load the player catalog from a CSV file and annotate every player with
/// derived fantasy points, per-game average, and salary.
pub fn load_catalog(path: &Path) -> Result<Vec<Player>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open player catalog at {}", path.display()))?;

    let mut players = Vec::new();
    for row in reader.deserialize::<CatalogRow>() {
        let row = row.context("failed to parse player catalog row")?;
        let position = Position::from_str_pos(&row.position).with_context(|| {
            format!("unknown position '{}' for player {}", row.position, row.id)
        })?;
        let stats = row.stats();
        players.push(Player::from_stats(
            row.id,
            row.name,
            position,
            row.team,
            row.games_played,
            stats,
        ));
    }

    Ok(players)
}
