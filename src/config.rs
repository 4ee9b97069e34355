// Configuration loading and parsing (league.toml).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::Position;
use crate::roster::PositionCaps;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    league: LeagueSection,
    ai: AiSection,
    database: DatabaseSection,
    data: DataSection,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    name: String,
    salary_cap: u32,
    roster: HashMap<String, usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct AiSection {
    team_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    players: String,
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

/// The validated engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub league_name: String,
    pub salary_cap: u32,
    pub caps: PositionCaps,
    pub ai_team_names: Vec<String>,
    pub db_path: String,
    pub players_path: String,
}

impl Default for Config {
    /// The standard league shape, used when no config file is in play
    /// (tests, embedded use).
    fn default() -> Self {
        Config {
            league_name: "Gridiron".to_string(),
            salary_cap: crate::league::SALARY_CAP,
            caps: PositionCaps::standard(),
            ai_team_names: crate::league::AI_TEAM_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            db_path: "gridiron.db".to_string(),
            players_path: "data/players.csv".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let league_text = read_file(&league_path)?;
    let file: ConfigFile = toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;

    validate(&file)?;

    // Validated above, so the position strings all parse.
    let caps = PositionCaps::from_config(&file.league.roster)
        .expect("roster table validated before conversion");

    Ok(Config {
        league_name: file.league.name,
        salary_cap: file.league.salary_cap,
        caps,
        ai_team_names: file.ai.team_names,
        db_path: file.database.path,
        players_path: file.data.players,
    })
}

/// Ensure the config file exists by copying it from `defaults/` when
/// missing. Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &ConfigFile) -> Result<(), ConfigError> {
    if file.league.salary_cap == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.salary_cap".into(),
            message: "must be greater than 0".into(),
        });
    }

    if file.league.roster.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.roster".into(),
            message: "must define at least one position".into(),
        });
    }

    for (pos_str, &count) in &file.league.roster {
        if Position::from_str_pos(pos_str).is_none() {
            return Err(ConfigError::ValidationError {
                field: format!("league.roster.{pos_str}"),
                message: "unknown position".into(),
            });
        }
        if count == 0 {
            return Err(ConfigError::ValidationError {
                field: format!("league.roster.{pos_str}"),
                message: "must be > 0".into(),
            });
        }
    }

    if file.ai.team_names.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "ai.team_names".into(),
            message: "must list at least one team name".into(),
        });
    }

    if file.database.path.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "database.path".into(),
            message: "must not be empty".into(),
        });
    }

    if file.data.players.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.players".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
