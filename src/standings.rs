// League-wide leaderboard aggregation.
//
// Read-only: fetches every member's roster and the user catalog from the
// store concurrently, sums fantasy points, resolves display identities, and
// sorts. There is no league-wide snapshot: each member's total reflects
// whatever was persisted at the moment of that member's individual read.

use std::collections::HashMap;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::keys;
use crate::league::{League, User};
use crate::roster::Roster;
use crate::store::{read_json, KvStore};

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsEntry {
    pub member_id: String,
    pub display_name: String,
    pub roster: Roster,
    /// Sum of roster fantasy points, rounded to one decimal.
    pub total_points: f64,
}

/// Compute the leaderboard for a league.
///
/// One entry per member, in descending point order; ties break ascending by
/// member id so the ordering is deterministic. A member whose roster cannot
/// be read scores as empty: isolated store failures degrade that member's
/// row, never the whole board.
pub async fn standings(store: &dyn KvStore, league: &League) -> Vec<StandingsEntry> {
    let roster_reads = join_all(
        league
            .members
            .iter()
            .map(|member| {
                let key = keys::roster(member, &league.id);
                async move { read_json::<Roster>(store, &key).await }
            }),
    );
    let (display_names, rosters) = tokio::join!(load_display_names(store), roster_reads);

    let mut entries: Vec<StandingsEntry> = league
        .members
        .iter()
        .zip(rosters)
        .map(|(member_id, roster)| {
            let roster = roster.unwrap_or_default();
            let display_name = display_names
                .get(member_id)
                .cloned()
                .unwrap_or_else(|| member_id.clone());
            let total_points = roster.total_points();
            StandingsEntry {
                member_id: member_id.clone(),
                display_name,
                roster,
                total_points,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_points
            .partial_cmp(&a.total_points)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.member_id.cmp(&b.member_id))
    });

    entries
}

/// Resolve user ids to display names via the `user:` prefix listing.
/// Failures degrade to an empty map; affected members fall back to their id.
async fn load_display_names(store: &dyn KvStore) -> HashMap<String, String> {
    let user_keys = match store.list(keys::USER_PREFIX).await {
        Ok(list) => list,
        Err(err) => {
            warn!("user listing failed, falling back to member ids: {err}");
            return HashMap::new();
        }
    };

    let users = join_all(
        user_keys
            .iter()
            .map(|key| read_json::<User>(store, key)),
    )
    .await;

    users
        .into_iter()
        .flatten()
        .map(|user| (user.id.clone(), user.display_name().to_string()))
        .collect()
}
