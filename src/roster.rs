// Roster rules: position capacities, duplicate prevention, budget checks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Player, Position};
use crate::scoring;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a player could not be added to a roster. Every variant carries enough
/// detail for the caller to render a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("maximum {capacity} {position} players allowed")]
    PositionFull { position: Position, capacity: usize },

    #[error("player {player_id} already on roster")]
    DuplicatePlayer { player_id: String },

    #[error("cannot afford {player_name}: over budget by ${overage}")]
    OverBudget { player_name: String, overage: u32 },
}

// ---------------------------------------------------------------------------
// PositionCaps
// ---------------------------------------------------------------------------

/// Per-position slot limits for a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCaps {
    caps: HashMap<Position, usize>,
}

impl PositionCaps {
    /// The standard capacity table: QB 2, WR 4, RB 4, TE 2, DEF 1, K 1
    /// (10 slots total).
    pub fn standard() -> Self {
        let mut caps = HashMap::new();
        caps.insert(Position::QB, 2);
        caps.insert(Position::WR, 4);
        caps.insert(Position::RB, 4);
        caps.insert(Position::TE, 2);
        caps.insert(Position::DEF, 1);
        caps.insert(Position::K, 1);
        PositionCaps { caps }
    }

    /// Build from a config mapping of position strings to slot counts
    /// (e.g. the `[league.roster]` table). Unknown position strings are
    /// rejected by config validation before this is called.
    pub fn from_config(roster: &HashMap<String, usize>) -> Option<Self> {
        let mut caps = HashMap::new();
        for (pos_str, &count) in roster {
            let pos = Position::from_str_pos(pos_str)?;
            caps.insert(pos, count);
        }
        Some(PositionCaps { caps })
    }

    /// Slot capacity for a position. Positions absent from the table have
    /// zero slots.
    pub fn capacity(&self, position: Position) -> usize {
        self.caps.get(&position).copied().unwrap_or(0)
    }

    /// Total number of roster slots.
    pub fn total_slots(&self) -> usize {
        self.caps.values().sum()
    }
}

impl Default for PositionCaps {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// A roster: the full player records selected by one (user, league) pair.
/// Serializes as a plain list of players, which is also the persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of rostered players at the given position.
    pub fn position_count(&self, position: Position) -> usize {
        self.players.iter().filter(|p| p.position == position).count()
    }

    /// Whether a player id is already rostered.
    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// Total salary committed to this roster.
    pub fn spend(&self) -> u32 {
        self.players.iter().map(|p| p.salary).sum()
    }

    /// Total fantasy points across the roster, rounded to one decimal.
    pub fn total_points(&self) -> f64 {
        scoring::round_to_tenth(self.players.iter().map(|p| p.fantasy_points).sum())
    }

    /// Try to add a player, enforcing position capacity, duplicate
    /// prevention, and (when `budget` is given) the salary cap. On success
    /// the player is appended; on failure the roster is unchanged.
    pub fn try_add(
        &mut self,
        player: Player,
        caps: &PositionCaps,
        budget: Option<u32>,
    ) -> Result<(), RosterError> {
        let capacity = caps.capacity(player.position);
        if self.position_count(player.position) >= capacity {
            return Err(RosterError::PositionFull {
                position: player.position,
                capacity,
            });
        }

        if self.contains(&player.id) {
            return Err(RosterError::DuplicatePlayer {
                player_id: player.id,
            });
        }

        if let Some(budget) = budget {
            let new_spend = self.spend() + player.salary;
            if new_spend > budget {
                return Err(RosterError::OverBudget {
                    player_name: player.name,
                    overage: new_spend - budget,
                });
            }
        }

        self.players.push(player);
        Ok(())
    }

    /// Remove a player by id. Returns the removed record, or `None` if the
    /// id was not rostered (a silent no-op).
    pub fn remove(&mut self, player_id: &str) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == player_id)?;
        Some(self.players.remove(idx))
    }
}
