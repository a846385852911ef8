// Engine failure conditions.

use thiserror::Error;

use crate::model::GameId;

/// The one way a standings computation can fail: a completed game whose two
/// scores are level. Softball has no tie games, so the whole table is
/// withheld until the score is corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StandingsError {
    #[error("game {game_id} is recorded as a {runs}-{runs} tie; correct the score before standings can be ranked")]
    TiedGame { game_id: GameId, runs: u32 },
}
