// Demo driver for the roster/league engine.
//
// Startup sequence:
// 1. Initialize tracing (stderr, env-filtered)
// 2. Load config (copying defaults on first run)
// 3. Open the SQLite store
// 4. Load the player catalog and annotate derived fields
// 5. Ensure a demo account and create a league with synthetic opponents
// 6. Print the invite code and the standings table

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use gridiron::catalog;
use gridiron::config;
use gridiron::generator;
use gridiron::league::LeagueType;
use gridiron::service::{AccountError, Engine};
use gridiron::standings;
use gridiron::store::SqliteStore;

const DEMO_EMAIL: &str = "demo@gridiron.local";
const DEMO_PASSWORD: &str = "demo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("gridiron engine starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "config loaded: league '{}', {} roster slots, ${} salary cap",
        config.league_name,
        config.caps.total_slots(),
        config.salary_cap
    );

    let store = Arc::new(
        SqliteStore::open(&config.db_path).context("failed to open store")?,
    );
    info!("store opened at {}", config.db_path);

    let players = catalog::load_catalog(Path::new(&config.players_path))
        .context("failed to load player catalog")?;
    info!("loaded {} players", players.len());

    let engine = Engine::with_config(store, &config);

    // Reuse the demo account across runs; register on first run.
    let user = match engine.login(DEMO_EMAIL, DEMO_PASSWORD).await {
        Ok(user) => user,
        Err(AccountError::UnknownUser) => engine
            .register(DEMO_EMAIL, DEMO_PASSWORD)
            .await
            .map_err(|e| anyhow::anyhow!("failed to register demo account: {e}"))?,
        Err(e) => anyhow::bail!("failed to log in demo account: {e}"),
    };
    info!("session user: {}", user.email);

    let mut rng = generator::entropy_rng();
    let league = engine
        .create_league(
            &user,
            &config.league_name,
            LeagueType::SalaryWeekly,
            &players,
            &mut rng,
        )
        .await;

    println!("League '{}' created ({})", league.name, league.league_type.label());
    println!("Invite code: {}", league.invite_code);
    println!();

    let board = standings::standings(engine.store(), &league).await;
    println!("{:<4} {:<24} {:>8} {:>10}", "#", "Team", "Players", "Points");
    for (rank, entry) in board.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:>8} {:>10.1}",
            rank + 1,
            entry.display_name,
            entry.roster.len(),
            entry.total_points
        );
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
