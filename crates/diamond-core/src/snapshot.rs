// Tournament snapshots: the complete teams + games input handed to the engine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TournamentConfig;
use crate::error::StandingsError;
use crate::leaders::{self, LeaderBoard};
use crate::model::{Game, Stage, Team};
use crate::standings::{self, Standing};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the engine needs, as exported by the score entry application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub games: Vec<Game>,
}

impl TournamentSnapshot {
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn preliminary_games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| g.stage == Stage::Preliminary)
    }

    pub fn championship_game(&self) -> Option<&Game> {
        self.games.iter().find(|g| g.stage == Stage::Championship)
    }

    pub fn championship_game_mut(&mut self) -> Option<&mut Game> {
        self.games.iter_mut().find(|g| g.stage == Stage::Championship)
    }

    pub fn standings(&self) -> Result<Vec<Standing>, StandingsError> {
        standings::compute_standings(&self.teams, &self.games)
    }

    pub fn leaders(&self, config: &TournamentConfig) -> LeaderBoard {
        leaders::compute_leaders(&self.teams, &self.games, config)
    }
}
