// Team rosters.

use serde::{Deserialize, Serialize};

pub type TeamId = u32;
pub type PlayerId = u32;

/// A rostered player. Jersey numbers are not guaranteed unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub number: u32,
    pub name: String,
    /// Position or staff title, free text.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub place_of_birth: String,
}

/// A registered team and its roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Team {
    /// Create a team with an empty roster.
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Team {
            id,
            name: name.into(),
            players: Vec::new(),
        }
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }
}

/// Look up a team's display name, falling back to a placeholder for ids that
/// are not registered.
pub fn team_name(teams: &[Team], team_id: TeamId) -> &str {
    teams
        .iter()
        .find(|t| t.id == team_id)
        .map(|t| t.name.as_str())
        .unwrap_or("Unknown Team")
}
