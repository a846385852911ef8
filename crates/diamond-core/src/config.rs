// Tournament configuration loading and parsing (tournament.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const CONFIG_FILE: &str = "tournament.toml";

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
// tournament.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub name: String,
    /// Innings in a regulation game; sets the ERA scale and when extra
    /// innings start.
    pub regulation_innings: u32,
    /// Preliminary-round games each team plays before the final is seeded.
    pub games_per_team: u32,
    pub leaderboard: LeaderboardConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            name: "Round-Robin Softball Tournament".into(),
            regulation_innings: 7,
            games_per_team: 5,
            leaderboard: LeaderboardConfig::default(),
        }
    }
}

impl TournamentConfig {
    /// Outs in a regulation game (21 for seven innings).
    pub fn outs_per_game(&self) -> u32 {
        self.regulation_innings * 3
    }
}

/// Qualification thresholds for the rate-stat leader boards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Entries shown per board.
    pub limit: usize,
    /// Plate appearances per team game needed to qualify as a batter.
    pub min_pa_per_game: f64,
    /// Innings pitched per team game needed to qualify as a pitcher.
    pub min_ip_per_game: f64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        LeaderboardConfig {
            limit: 10,
            min_pa_per_game: 2.1,
            min_ip_per_game: 2.3,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `tournament.toml` from `config_dir`.
pub fn load_config_from(config_dir: &Path) -> Result<TournamentConfig, ConfigError> {
    let path = config_dir.join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let config = parse_config(&text, &path)?;
    validate(&config)?;
    Ok(config)
}

/// Like `load_config_from`, but a missing file yields the built-in defaults.
/// Parse and validation errors are still reported.
pub fn load_or_default(config_dir: &Path) -> Result<TournamentConfig, ConfigError> {
    match load_config_from(config_dir) {
        Err(ConfigError::FileNotFound { path }) => {
            info!("{} not found, using default tournament settings", path.display());
            Ok(TournamentConfig::default())
        }
        other => other,
    }
}

/// Copy `defaults/tournament.toml` to `config/tournament.toml` under
/// `base_dir` if the latter does not exist yet. Returns the path written, or
/// `None` when nothing was copied.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if target.exists() || !source.exists() {
        return Ok(None);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;
    Ok(Some(target))
}

fn parse_config(text: &str, path: &Path) -> Result<TournamentConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &TournamentConfig) -> Result<(), ConfigError> {
    let counts: &[(&str, u64)] = &[
        ("regulation_innings", config.regulation_innings as u64),
        ("games_per_team", config.games_per_team as u64),
        ("leaderboard.limit", config.leaderboard.limit as u64),
    ];
    for (name, val) in counts {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    let rates: &[(&str, f64)] = &[
        ("leaderboard.min_pa_per_game", config.leaderboard.min_pa_per_game),
        ("leaderboard.min_ip_per_game", config.leaderboard.min_ip_per_game),
    ];
    for (name, val) in rates {
        if !val.is_finite() || *val <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a positive number, got {val}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
