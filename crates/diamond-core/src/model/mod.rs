// Tournament data model: teams, games, and box score lines.

pub mod game;
pub mod stats;
pub mod team;

pub use game::{Game, GameId, GameOutcome, Inning, InningCell, LineTotals, Side, Stage};
pub use stats::{BattingStat, InningsPitched, PitchingStat};
pub use team::{team_name, Player, PlayerId, Team, TeamId};
