// Persisted key layout.
//
// Every record the engine writes lives under one of these key shapes. There
// is no schema version tag in the stored values; format changes need an
// out-of-band migration.

/// Prefix for user records (`user:<email>`).
pub const USER_PREFIX: &str = "user:";

/// Prefix for league records (`league:<leagueId>`).
pub const LEAGUE_PREFIX: &str = "league:";

/// The active session user record.
pub const CURRENT_USER: &str = "current_user";

/// User record, keyed by email.
pub fn user(email: &str) -> String {
    format!("{USER_PREFIX}{email}")
}

/// The list of leagues a user belongs to.
pub fn user_leagues(user_id: &str) -> String {
    format!("user_leagues:{user_id}")
}

/// A league record.
pub fn league(league_id: &str) -> String {
    format!("{LEAGUE_PREFIX}{league_id}")
}

/// A member's full roster snapshot within a league.
pub fn roster(user_id: &str, league_id: &str) -> String {
    format!("roster:{user_id}:{league_id}")
}

/// A member's cosmetic team settings within a league.
pub fn team_settings(user_id: &str, league_id: &str) -> String {
    format!("team_settings:{user_id}:{league_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shapes() {
        assert_eq!(user("a@b.c"), "user:a@b.c");
        assert_eq!(user_leagues("user_1"), "user_leagues:user_1");
        assert_eq!(league("league_9"), "league:league_9");
        assert_eq!(roster("user_1", "league_9"), "roster:user_1:league_9");
        assert_eq!(
            team_settings("user_1", "league_9"),
            "team_settings:user_1:league_9"
        );
    }

    #[test]
    fn prefixes_match_key_builders() {
        assert!(user("x").starts_with(USER_PREFIX));
        assert!(league("x").starts_with(LEAGUE_PREFIX));
    }
}
