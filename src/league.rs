// League, membership, and user records.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed salary budget for capped league types, in currency units.
pub const SALARY_CAP: u32 = 50_000;

/// Invite codes are this many uppercase alphanumeric characters.
pub const INVITE_CODE_LEN: usize = 8;

/// Display names for the synthetic opponents created with every league.
pub const AI_TEAM_NAMES: [&str; 5] = [
    "GridironGuru",
    "TouchdownTitan",
    "BlitzMaster",
    "EndZoneElite",
    "PlayoffPro",
];

// ---------------------------------------------------------------------------
// LeagueType
// ---------------------------------------------------------------------------

/// Competitive mode of a league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeagueType {
    /// No salary constraint; roster value is aggregate scoring alone.
    BestBall,
    /// Salary-capped, weekly scoring window.
    SalaryWeekly,
    /// Salary-capped, postseason scoring window.
    SalaryPostseason,
}

impl LeagueType {
    /// Whether rosters in this league are constrained by the salary cap.
    pub fn is_capped(&self) -> bool {
        !matches!(self, LeagueType::BestBall)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeagueType::BestBall => "Best Ball",
            LeagueType::SalaryWeekly => "Salary Cap (Weekly)",
            LeagueType::SalaryPostseason => "Salary Cap (Postseason)",
        }
    }
}

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

/// A league record. Created once; the only mutation afterwards is appending
/// to `members` when someone joins by invite code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub admin_id: String,
    pub invite_code: String,
    /// Member user ids in join order: the creator first, then the synthetic
    /// members, then anyone who joined by code.
    pub members: Vec<String>,
    pub league_type: LeagueType,
    /// Creation time as unix milliseconds.
    pub created_at: i64,
}

impl League {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// Process-wide sequence appended to generated ids so that two creations in
/// the same millisecond still get distinct ids.
static ID_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    ID_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// Generate a league id from the current UTC time.
pub fn generate_league_id() -> String {
    format!("league_{}_{}", Utc::now().timestamp_millis(), next_seq())
}

/// Generate a user id from the current UTC time.
pub fn generate_user_id() -> String {
    format!("user_{}_{}", Utc::now().timestamp_millis(), next_seq())
}

/// Generate a random invite code: uppercase letters and digits.
///
/// Uniqueness against existing leagues is the caller's responsibility
/// (`Engine::create_league` retries on collision).
pub fn generate_invite_code<R: Rng>(rng: &mut R) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..INVITE_CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Synthetic member id for the `idx`-th AI team of a league.
pub fn ai_member_id(league_id: &str, idx: usize) -> String {
    format!("ai_team_{league_id}_{idx}")
}

/// Synthetic member email, from which the display name is derived.
pub fn ai_email(team_name: &str) -> String {
    format!("{team_name}@ai.fantasy")
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A stored user record. Synthetic members carry the `is_ai` marker; human
/// accounts leave it defaulted off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_ai: bool,
}

impl User {
    /// Leaderboard display identity: synthetic members show the local part
    /// of their email, humans show the full email.
    pub fn display_name(&self) -> &str {
        if self.is_ai {
            self.email.split('@').next().unwrap_or(&self.email)
        } else {
            &self.email
        }
    }
}

// ---------------------------------------------------------------------------
// TeamSettings
// ---------------------------------------------------------------------------

/// Cosmetic per-(user, league) team identity. Independent lifecycle from the
/// roster; missing records load as defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSettings {
    pub name: String,
    pub motto: String,
    pub avatar: String,
}

impl Default for TeamSettings {
    fn default() -> Self {
        TeamSettings {
            name: String::new(),
            motto: String::new(),
            avatar: "gladiator-1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::seeded_rng;

    #[test]
    fn league_type_capped_flags() {
        assert!(!LeagueType::BestBall.is_capped());
        assert!(LeagueType::SalaryWeekly.is_capped());
        assert!(LeagueType::SalaryPostseason.is_capped());
    }

    #[test]
    fn league_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&LeagueType::BestBall).unwrap(),
            "\"best_ball\""
        );
        assert_eq!(
            serde_json::to_string(&LeagueType::SalaryWeekly).unwrap(),
            "\"salary_weekly\""
        );
        let back: LeagueType = serde_json::from_str("\"salary_postseason\"").unwrap();
        assert_eq!(back, LeagueType::SalaryPostseason);
    }

    #[test]
    fn invite_code_shape() {
        let mut rng = seeded_rng(1);
        for _ in 0..100 {
            let code = generate_invite_code(&mut rng);
            assert_eq!(code.len(), INVITE_CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn invite_code_seeded_is_reproducible() {
        let a = generate_invite_code(&mut seeded_rng(99));
        let b = generate_invite_code(&mut seeded_rng(99));
        assert_eq!(a, b);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = generate_league_id();
        let b = generate_league_id();
        assert_ne!(a, b);
        assert!(a.starts_with("league_"));

        let u = generate_user_id();
        let v = generate_user_id();
        assert_ne!(u, v);
        assert!(u.starts_with("user_"));
    }

    #[test]
    fn ai_identity_helpers() {
        assert_eq!(ai_member_id("league_1", 2), "ai_team_league_1_2");
        assert_eq!(ai_email("GridironGuru"), "GridironGuru@ai.fantasy");
    }

    #[test]
    fn ai_display_name_is_local_part() {
        let user = User {
            id: "ai_team_league_1_0".to_string(),
            email: ai_email("GridironGuru"),
            password: "ai_team".to_string(),
            is_ai: true,
        };
        assert_eq!(user.display_name(), "GridironGuru");
    }

    #[test]
    fn human_display_name_is_email() {
        let user = User {
            id: "user_1".to_string(),
            email: "coach@example.com".to_string(),
            password: "hunter2".to_string(),
            is_ai: false,
        };
        assert_eq!(user.display_name(), "coach@example.com");
    }

    #[test]
    fn user_is_ai_defaults_off_in_old_records() {
        // Records persisted before the marker existed deserialize as human.
        let user: User =
            serde_json::from_str(r#"{"id":"u1","email":"a@b.c","password":"x"}"#).unwrap();
        assert!(!user.is_ai);
    }

    #[test]
    fn membership_check() {
        let league = League {
            id: "league_1".to_string(),
            name: "Test".to_string(),
            admin_id: "u1".to_string(),
            invite_code: "ABCD1234".to_string(),
            members: vec!["u1".to_string(), "ai_team_league_1_0".to_string()],
            league_type: LeagueType::BestBall,
            created_at: 0,
        };
        assert!(league.is_member("u1"));
        assert!(!league.is_member("u2"));
    }

    #[test]
    fn team_settings_default_avatar() {
        let settings = TeamSettings::default();
        assert_eq!(settings.avatar, "gladiator-1");
        assert!(settings.name.is_empty());
    }
}
