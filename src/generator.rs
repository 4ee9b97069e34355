// Random roster generation for synthetic league members.
//
// Two modes mirror the two league families: an unconstrained shuffle-and-take
// for best ball, and a greedy budget-constrained pick for salary leagues.
// Both accept an injected RNG so tests can pin a seed. The budget mode is a
// greedy heuristic, not a knapsack solver: a slot with no affordable
// candidate is simply left unfilled.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::{Player, Position};
use crate::roster::{PositionCaps, Roster};

/// Build a roster ignoring salaries: shuffle the catalog, then take the
/// first `capacity` players at each position in capacity-table order.
pub fn best_ball_roster<R: Rng>(catalog: &[Player], caps: &PositionCaps, rng: &mut R) -> Roster {
    let mut pool: Vec<&Player> = catalog.iter().collect();
    pool.shuffle(rng);

    let mut roster = Roster::new();
    for position in Position::ALL {
        let slots = caps.capacity(position);
        roster.players.extend(
            pool.iter()
                .filter(|p| p.position == position)
                .take(slots)
                .map(|p| (*p).clone()),
        );
    }

    roster
}

/// Build a roster under a salary budget. For each slot, pick uniformly at
/// random among the not-yet-selected players at that position whose salary
/// fits the remaining budget; skip the slot when none fit. Single pass, no
/// backtracking, so the budget invariant holds by construction but slots
/// may remain unfilled.
pub fn salary_cap_roster<R: Rng>(
    catalog: &[Player],
    caps: &PositionCaps,
    budget: u32,
    rng: &mut R,
) -> Roster {
    let mut pool: Vec<&Player> = catalog.iter().collect();
    pool.shuffle(rng);

    let mut roster = Roster::new();
    let mut selected: HashSet<&str> = HashSet::new();
    let mut remaining = budget;

    for position in Position::ALL {
        for _ in 0..caps.capacity(position) {
            let affordable: Vec<&&Player> = pool
                .iter()
                .filter(|p| {
                    p.position == position
                        && p.salary <= remaining
                        && !selected.contains(p.id.as_str())
                })
                .collect();

            if let Some(pick) = affordable.choose(rng) {
                selected.insert(pick.id.as_str());
                remaining -= pick.salary;
                roster.players.push((**pick).clone());
            }
        }
    }

    roster
}

/// A seeded RNG for reproducible roster generation.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// An entropy-seeded RNG for production use.
pub fn entropy_rng() -> ChaCha8Rng {
    ChaCha8Rng::from_entropy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlayerStats;

    /// Helper: a synthetic catalog with `per_position` players at every
    /// position, salaries stepping up from `base_salary` in increments of 100.
    fn synthetic_catalog(per_position: usize, base_salary: u32) -> Vec<Player> {
        let mut players = Vec::new();
        for position in Position::ALL {
            for i in 0..per_position {
                let mut p = Player::from_stats(
                    format!("{}{}", position.display_str().to_lowercase(), i + 1),
                    format!("{} {}", position, i + 1),
                    position,
                    "TST",
                    16,
                    PlayerStats::default(),
                );
                p.salary = base_salary + (i as u32) * 100;
                players.push(p);
            }
        }
        players
    }

    // ------------------------------------------------------------------
    // Best ball mode
    // ------------------------------------------------------------------

    #[test]
    fn best_ball_fills_every_slot() {
        let catalog = synthetic_catalog(6, 1000);
        let caps = PositionCaps::standard();
        let mut rng = seeded_rng(7);

        let roster = best_ball_roster(&catalog, &caps, &mut rng);
        assert_eq!(roster.len(), caps.total_slots());
        for position in Position::ALL {
            assert_eq!(roster.position_count(position), caps.capacity(position));
        }
    }

    #[test]
    fn best_ball_no_duplicates() {
        let catalog = synthetic_catalog(6, 1000);
        let caps = PositionCaps::standard();
        let mut rng = seeded_rng(11);

        let roster = best_ball_roster(&catalog, &caps, &mut rng);
        let mut ids: Vec<&str> = roster.players.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), roster.len());
    }

    #[test]
    fn best_ball_same_seed_same_roster() {
        let catalog = synthetic_catalog(6, 1000);
        let caps = PositionCaps::standard();

        let a = best_ball_roster(&catalog, &caps, &mut seeded_rng(42));
        let b = best_ball_roster(&catalog, &caps, &mut seeded_rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn best_ball_short_catalog_takes_what_exists() {
        // Only one player per position: WR/RB slots cannot all be filled.
        let catalog = synthetic_catalog(1, 1000);
        let caps = PositionCaps::standard();
        let mut rng = seeded_rng(3);

        let roster = best_ball_roster(&catalog, &caps, &mut rng);
        assert_eq!(roster.len(), 6);
    }

    // ------------------------------------------------------------------
    // Salary cap mode
    // ------------------------------------------------------------------

    #[test]
    fn salary_mode_never_exceeds_budget() {
        let catalog = synthetic_catalog(6, 5000);
        let caps = PositionCaps::standard();

        for seed in 0..50 {
            let roster = salary_cap_roster(&catalog, &caps, 50_000, &mut seeded_rng(seed));
            assert!(
                roster.spend() <= 50_000,
                "seed {seed}: spend {} over budget",
                roster.spend()
            );
            for position in Position::ALL {
                assert!(
                    roster.position_count(position) <= caps.capacity(position),
                    "seed {seed}: too many {position}"
                );
            }
        }
    }

    #[test]
    fn salary_mode_no_duplicates() {
        let catalog = synthetic_catalog(6, 1000);
        let caps = PositionCaps::standard();

        for seed in 0..20 {
            let roster = salary_cap_roster(&catalog, &caps, 50_000, &mut seeded_rng(seed));
            let mut ids: Vec<&str> = roster.players.iter().map(|p| p.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), roster.len(), "seed {seed}");
        }
    }

    #[test]
    fn salary_mode_fills_all_slots_when_cheap() {
        // 10 slots at <= 1500 each always fit in 50k.
        let catalog = synthetic_catalog(6, 1000);
        let caps = PositionCaps::standard();
        let roster = salary_cap_roster(&catalog, &caps, 50_000, &mut seeded_rng(9));
        assert_eq!(roster.len(), caps.total_slots());
    }

    #[test]
    fn salary_mode_leaves_unaffordable_slots_empty() {
        // Every player costs 9000; a 20k budget fits at most 2 of them.
        let catalog = synthetic_catalog(3, 9000);
        let mut expensive = catalog.clone();
        for p in &mut expensive {
            p.salary = 9000;
        }
        let caps = PositionCaps::standard();

        let roster = salary_cap_roster(&expensive, &caps, 20_000, &mut seeded_rng(5));
        assert_eq!(roster.len(), 2);
        assert!(roster.spend() <= 20_000);
    }

    #[test]
    fn salary_mode_zero_budget_empty_roster() {
        let catalog = synthetic_catalog(6, 1000);
        let caps = PositionCaps::standard();
        let roster = salary_cap_roster(&catalog, &caps, 0, &mut seeded_rng(1));
        assert!(roster.is_empty());
    }

    #[test]
    fn salary_mode_same_seed_same_roster() {
        let catalog = synthetic_catalog(6, 2000);
        let caps = PositionCaps::standard();

        let a = salary_cap_roster(&catalog, &caps, 50_000, &mut seeded_rng(123));
        let b = salary_cap_roster(&catalog, &caps, 50_000, &mut seeded_rng(123));
        assert_eq!(a, b);
    }

    #[test]
    fn salary_mode_empty_catalog() {
        let caps = PositionCaps::standard();
        let roster = salary_cap_roster(&[], &caps, 50_000, &mut seeded_rng(1));
        assert!(roster.is_empty());
    }
}
