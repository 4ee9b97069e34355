// Engine operations against the persistent store.
//
// `Engine` is the explicit context object for every store-facing operation:
// accounts, league creation/joining, roster edits, and team settings. All
// session state lives in the store or in values the caller holds; nothing is
// ambient.
//
// Persistence model: validation happens against the in-memory state the
// caller holds, then the full record is overwritten. The store interface has
// no versioning primitive, so writes are last-writer-wins. Store failures
// are logged and degrade to defaults on read / best-effort on write; only
// validation failures surface as typed errors.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::Player;
use crate::config::Config;
use crate::generator;
use crate::keys;
use crate::league::{
    ai_email, ai_member_id, generate_invite_code, generate_league_id, generate_user_id, League,
    LeagueType, TeamSettings, User, AI_TEAM_NAMES, SALARY_CAP,
};
use crate::roster::{PositionCaps, Roster, RosterError};
use crate::store::{read_json, write_json, KvStore};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Account operation failures. Expected and recoverable; surfaced verbatim
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("email already registered")]
    EmailTaken,

    #[error("user not found")]
    UnknownUser,

    #[error("invalid password")]
    InvalidPassword,
}

/// League join failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("invalid invite code")]
    InvalidInviteCode,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The roster/league engine: every operation that reads or writes the store
/// goes through here.
pub struct Engine {
    store: Arc<dyn KvStore>,
    caps: PositionCaps,
    salary_cap: u32,
    ai_team_names: Vec<String>,
}

impl Engine {
    /// Engine with the standard league shape (10 slots, 50k cap, five
    /// synthetic opponents).
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Engine {
            store,
            caps: PositionCaps::standard(),
            salary_cap: SALARY_CAP,
            ai_team_names: AI_TEAM_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Engine configured from a loaded `Config`.
    pub fn with_config(store: Arc<dyn KvStore>, config: &Config) -> Self {
        Engine {
            store,
            caps: config.caps.clone(),
            salary_cap: config.salary_cap,
            ai_team_names: config.ai_team_names.clone(),
        }
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    pub fn caps(&self) -> &PositionCaps {
        &self.caps
    }

    pub fn salary_cap(&self) -> u32 {
        self.salary_cap
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Create an account and make it the active session user.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AccountError> {
        if read_json::<User>(self.store(), &keys::user(email))
            .await
            .is_some()
        {
            return Err(AccountError::EmailTaken);
        }

        let user = User {
            id: generate_user_id(),
            email: email.to_string(),
            password: password.to_string(),
            is_ai: false,
        };

        write_json(self.store(), &keys::user(email), &user).await;
        write_json(self.store(), &keys::user_leagues(&user.id), &Vec::<League>::new()).await;
        self.set_current_user(&user).await;

        info!("registered account {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Authenticate an existing account and make it the active session user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let user = read_json::<User>(self.store(), &keys::user(email))
            .await
            .ok_or(AccountError::UnknownUser)?;

        if user.password != password {
            return Err(AccountError::InvalidPassword);
        }

        self.set_current_user(&user).await;
        Ok(user)
    }

    /// The active session user, if any.
    pub async fn current_user(&self) -> Option<User> {
        read_json(self.store(), keys::CURRENT_USER).await
    }

    /// Clear the active session user.
    pub async fn logout(&self) {
        if let Err(err) = self.store.delete(keys::CURRENT_USER).await {
            warn!("failed to clear session user: {err}");
        }
    }

    /// The session record omits the password; it identifies, it does not
    /// authenticate.
    async fn set_current_user(&self, user: &User) {
        let session = User {
            password: String::new(),
            ..user.clone()
        };
        write_json(self.store(), keys::CURRENT_USER, &session).await;
    }

    // ------------------------------------------------------------------
    // Leagues
    // ------------------------------------------------------------------

    /// The leagues a user belongs to. Missing or unreadable list loads as
    /// empty.
    pub async fn user_leagues(&self, user_id: &str) -> Vec<League> {
        read_json(self.store(), &keys::user_leagues(user_id))
            .await
            .unwrap_or_default()
    }

    /// Create a league: persist the league record, fabricate the synthetic
    /// opponents with generated rosters (mode per league type), give the
    /// creator an empty roster, and record the league in the creator's list.
    pub async fn create_league<R: Rng>(
        &self,
        admin: &User,
        name: &str,
        league_type: LeagueType,
        catalog: &[Player],
        rng: &mut R,
    ) -> League {
        let league_id = generate_league_id();
        let invite_code = self.unique_invite_code(rng).await;

        let ai_ids: Vec<String> = (0..self.ai_team_names.len())
            .map(|idx| ai_member_id(&league_id, idx))
            .collect();

        let mut members = vec![admin.id.clone()];
        members.extend(ai_ids.iter().cloned());

        let league = League {
            id: league_id.clone(),
            name: name.to_string(),
            admin_id: admin.id.clone(),
            invite_code,
            members,
            league_type,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        write_json(self.store(), &keys::league(&league_id), &league).await;

        for (idx, team_name) in self.ai_team_names.iter().enumerate() {
            let ai_user = User {
                id: ai_ids[idx].clone(),
                email: ai_email(team_name),
                password: "ai_team".to_string(),
                is_ai: true,
            };
            write_json(self.store(), &keys::user(&ai_user.email), &ai_user).await;

            let roster = match league_type {
                LeagueType::BestBall => generator::best_ball_roster(catalog, &self.caps, rng),
                _ => generator::salary_cap_roster(catalog, &self.caps, self.salary_cap, rng),
            };
            write_json(
                self.store(),
                &keys::roster(&ai_user.id, &league_id),
                &roster,
            )
            .await;
        }

        write_json(
            self.store(),
            &keys::roster(&admin.id, &league_id),
            &Roster::new(),
        )
        .await;
        self.append_user_league(&admin.id, &league).await;

        info!(
            "created league {} ({}) with {} synthetic members",
            league.id,
            league_type.label(),
            self.ai_team_names.len()
        );
        league
    }

    /// Join a league by invite code (case-insensitive). Idempotent: joining
    /// a league the user is already in returns it unchanged, with no
    /// duplicate membership and no roster reset.
    pub async fn join_league(&self, user: &User, code: &str) -> Result<League, JoinError> {
        let league_keys = match self.store.list(keys::LEAGUE_PREFIX).await {
            Ok(list) => list,
            Err(err) => {
                warn!("league listing failed during join: {err}");
                Vec::new()
            }
        };

        for key in league_keys {
            let Some(mut league) = read_json::<League>(self.store(), &key).await else {
                continue;
            };
            if !league.invite_code.eq_ignore_ascii_case(code) {
                continue;
            }

            if !league.is_member(&user.id) {
                league.members.push(user.id.clone());
                write_json(self.store(), &key, &league).await;
                write_json(
                    self.store(),
                    &keys::roster(&user.id, &league.id),
                    &Roster::new(),
                )
                .await;
                self.append_user_league(&user.id, &league).await;
                info!("user {} joined league {}", user.id, league.id);
            }

            return Ok(league);
        }

        Err(JoinError::InvalidInviteCode)
    }

    /// Append a league to a user's stored league list, skipping leagues
    /// already present.
    async fn append_user_league(&self, user_id: &str, league: &League) {
        let key = keys::user_leagues(user_id);
        let mut leagues: Vec<League> = read_json(self.store(), &key).await.unwrap_or_default();
        if leagues.iter().any(|l| l.id == league.id) {
            return;
        }
        leagues.push(league.clone());
        write_json(self.store(), &key, &leagues).await;
    }

    /// Generate an invite code that no stored league currently uses.
    /// Collisions are retried a bounded number of times; with 36^8 possible
    /// codes the loop terminates on the first attempt in practice.
    async fn unique_invite_code<R: Rng>(&self, rng: &mut R) -> String {
        let existing = self.existing_invite_codes().await;
        let mut code = generate_invite_code(rng);
        for _ in 0..100 {
            if !existing.iter().any(|c| c.eq_ignore_ascii_case(&code)) {
                break;
            }
            code = generate_invite_code(rng);
        }
        code
    }

    async fn existing_invite_codes(&self) -> Vec<String> {
        let league_keys = match self.store.list(keys::LEAGUE_PREFIX).await {
            Ok(list) => list,
            Err(err) => {
                warn!("league listing failed during code generation: {err}");
                return Vec::new();
            }
        };
        let mut codes = Vec::new();
        for key in league_keys {
            if let Some(league) = read_json::<League>(self.store(), &key).await {
                codes.push(league.invite_code);
            }
        }
        codes
    }

    // ------------------------------------------------------------------
    // Rosters
    // ------------------------------------------------------------------

    /// Load a member's persisted roster. Missing or unreadable records load
    /// as an empty roster.
    pub async fn load_roster(&self, user_id: &str, league_id: &str) -> Roster {
        read_json(self.store(), &keys::roster(user_id, league_id))
            .await
            .unwrap_or_default()
    }

    /// Add a player to a roster and persist the result. Validation runs
    /// against the in-memory roster; on success the whole record is
    /// rewritten. Returns the remaining budget for capped league types.
    pub async fn add_player(
        &self,
        user_id: &str,
        league: &League,
        roster: &mut Roster,
        player: Player,
    ) -> Result<Option<u32>, RosterError> {
        let budget = league.league_type.is_capped().then_some(self.salary_cap);
        roster.try_add(player, &self.caps, budget)?;

        write_json(self.store(), &keys::roster(user_id, &league.id), roster).await;
        Ok(self.remaining_budget(league.league_type, roster))
    }

    /// Remove a player (no-op for unknown ids) and persist the result.
    /// Returns the remaining budget for capped league types.
    pub async fn remove_player(
        &self,
        user_id: &str,
        league: &League,
        roster: &mut Roster,
        player_id: &str,
    ) -> Option<u32> {
        if roster.remove(player_id).is_some() {
            write_json(self.store(), &keys::roster(user_id, &league.id), roster).await;
        }
        self.remaining_budget(league.league_type, roster)
    }

    /// Remaining budget for a roster, or `None` for uncapped league types.
    pub fn remaining_budget(&self, league_type: LeagueType, roster: &Roster) -> Option<u32> {
        league_type
            .is_capped()
            .then(|| self.salary_cap.saturating_sub(roster.spend()))
    }

    // ------------------------------------------------------------------
    // Team settings
    // ------------------------------------------------------------------

    pub async fn save_team_settings(
        &self,
        user_id: &str,
        league_id: &str,
        settings: &TeamSettings,
    ) {
        write_json(
            self.store(),
            &keys::team_settings(user_id, league_id),
            settings,
        )
        .await;
    }

    /// Missing settings load as defaults.
    pub async fn load_team_settings(&self, user_id: &str, league_id: &str) -> TeamSettings {
        read_json(self.store(), &keys::team_settings(user_id, league_id))
            .await
            .unwrap_or_default()
    }
}
