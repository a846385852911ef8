// Championship game: seeding from the final standings, and the champion.

use serde::Serialize;
use tracing::info;

use crate::error::StandingsError;
use crate::model::{Game, GameOutcome, TeamId};
use crate::standings::Standing;

/// The championship pairing. The higher seed is the home side (team2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Matchup {
    pub visitor: TeamId,
    pub home: TeamId,
}

/// Second place visits first place once the round robin is over: more than
/// one team, and every team has played `games_per_team` games.
pub fn championship_matchup(standings: &[Standing], games_per_team: u32) -> Option<Matchup> {
    if standings.len() < 2 {
        return None;
    }
    if !standings.iter().all(|s| s.games_played() == games_per_team) {
        return None;
    }
    Some(Matchup {
        visitor: standings[1].team_id,
        home: standings[0].team_id,
    })
}

/// Write the pairing into the championship game. Returns whether anything
/// changed.
pub fn seed_championship(game: &mut Game, matchup: Matchup) -> bool {
    let seeded = (Some(matchup.visitor), Some(matchup.home));
    if (game.team1, game.team2) == seeded {
        return false;
    }
    game.team1 = seeded.0;
    game.team2 = seeded.1;
    info!(
        "championship game {} seeded: {} at {}",
        game.id, matchup.visitor, matchup.home
    );
    true
}

/// The tournament champion: the winner of a completed championship game.
/// `Ok(None)` while the game is unplayed or unassigned; a level score is the
/// same invalid-input error the standings report.
pub fn champion(game: &Game) -> Result<Option<TeamId>, StandingsError> {
    match game.outcome() {
        GameOutcome::Tied { runs } => Err(StandingsError::TiedGame {
            game_id: game.id,
            runs,
        }),
        GameOutcome::Unplayed => Ok(None),
        GameOutcome::Won { .. } => Ok(game.winner()),
    }
}
