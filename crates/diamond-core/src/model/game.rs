// Scheduled games, line scores, and per-game stat lines.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::stats::{BattingStat, PitchingStat};
use super::team::TeamId;
use crate::serde_utils::{self, NumberOrText};

pub type GameId = u32;

// ---------------------------------------------------------------------------
// Sides and stages
// ---------------------------------------------------------------------------

/// Which half of the matchup: `Team1` bats first, `Team2` is the home side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Team1 => 0,
            Side::Team2 => 1,
        }
    }
}

/// Round-robin games feed the standings; the championship game does not.
/// Stored on the wire as the `isChampionship` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum Stage {
    #[default]
    Preliminary,
    Championship,
}

impl From<bool> for Stage {
    fn from(is_championship: bool) -> Self {
        if is_championship {
            Stage::Championship
        } else {
            Stage::Preliminary
        }
    }
}

impl From<Stage> for bool {
    fn from(stage: Stage) -> bool {
        stage == Stage::Championship
    }
}

// ---------------------------------------------------------------------------
// Line score cells
// ---------------------------------------------------------------------------

/// One team's half of one inning on the line score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InningCell {
    /// Runs scored in a completed half-inning.
    Runs(u32),
    /// Not played yet (blank on the scorecard).
    #[default]
    Pending,
    /// The `X` mark: the home team did not need to bat.
    NotPlayed,
}

impl InningCell {
    /// Parse a scorecard entry: digits, blank, or `X`/`x`. Anything else is
    /// treated as blank.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case("x") {
            InningCell::NotPlayed
        } else {
            text.parse::<u32>().map(InningCell::Runs).unwrap_or(InningCell::Pending)
        }
    }

    pub fn runs(self) -> u32 {
        match self {
            InningCell::Runs(runs) => runs,
            InningCell::Pending | InningCell::NotPlayed => 0,
        }
    }

    /// Whether the batting team completed this half-inning.
    pub fn was_batted(self) -> bool {
        matches!(self, InningCell::Runs(_))
    }
}

impl Serialize for InningCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InningCell::Runs(runs) => serializer.serialize_u32(*runs),
            InningCell::Pending => serializer.serialize_str(""),
            InningCell::NotPlayed => serializer.serialize_str("X"),
        }
    }
}

impl<'de> Deserialize<'de> for InningCell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<NumberOrText>::deserialize(deserializer)?;
        Ok(match value {
            None => InningCell::Pending,
            Some(NumberOrText::Text(text)) => InningCell::parse(&text),
            Some(other) => other.to_u32().map(InningCell::Runs).unwrap_or_default(),
        })
    }
}

/// `[team1, team2]` cells for one inning.
pub type Inning = [InningCell; 2];

// ---------------------------------------------------------------------------
// Outcomes and line score totals
// ---------------------------------------------------------------------------

/// The result a game's two scores describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// At least one score is missing.
    Unplayed,
    /// Both scores present and equal: invalid in softball.
    Tied { runs: u32 },
    Won {
        winner: Side,
        winner_runs: u32,
        loser_runs: u32,
    },
}

/// R/H/E for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LineTotals {
    pub runs: u32,
    pub hits: Option<u32>,
    pub errors: Option<u32>,
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A scheduled game. Scores and team references are `None` until entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    #[serde(rename = "team1Id", default, deserialize_with = "serde_utils::optional_u32")]
    pub team1: Option<TeamId>,
    #[serde(rename = "team2Id", default, deserialize_with = "serde_utils::optional_u32")]
    pub team2: Option<TeamId>,
    #[serde(default, deserialize_with = "serde_utils::optional_u32")]
    pub score1: Option<u32>,
    #[serde(default, deserialize_with = "serde_utils::optional_u32")]
    pub score2: Option<u32>,
    #[serde(default, deserialize_with = "serde_utils::optional_u32")]
    pub hits1: Option<u32>,
    #[serde(default, deserialize_with = "serde_utils::optional_u32")]
    pub hits2: Option<u32>,
    #[serde(default, deserialize_with = "serde_utils::optional_u32")]
    pub errors1: Option<u32>,
    #[serde(default, deserialize_with = "serde_utils::optional_u32")]
    pub errors2: Option<u32>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub innings: Vec<Inning>,
    #[serde(default)]
    pub batting_stats: Vec<BattingStat>,
    #[serde(default)]
    pub pitching_stats: Vec<PitchingStat>,
    #[serde(rename = "isChampionship", default)]
    pub stage: Stage,
}

impl Game {
    /// A preliminary-round game with no scores entered.
    pub fn new(id: GameId, team1: TeamId, team2: TeamId) -> Self {
        Game {
            id,
            team1: Some(team1),
            team2: Some(team2),
            ..Game::default()
        }
    }

    /// Builder-style final score.
    pub fn with_score(mut self, score1: u32, score2: u32) -> Self {
        self.score1 = Some(score1);
        self.score2 = Some(score2);
        self
    }

    /// Builder-style line score; also sets the final score from it.
    pub fn with_innings(mut self, innings: Vec<Inning>) -> Self {
        self.innings = innings;
        self.recompute_score();
        self
    }

    pub fn team(&self, side: Side) -> Option<TeamId> {
        match side {
            Side::Team1 => self.team1,
            Side::Team2 => self.team2,
        }
    }

    pub fn score(&self, side: Side) -> Option<u32> {
        match side {
            Side::Team1 => self.score1,
            Side::Team2 => self.score2,
        }
    }

    /// Complete means both scores are present.
    pub fn is_complete(&self) -> bool {
        self.score1.is_some() && self.score2.is_some()
    }

    pub fn outcome(&self) -> GameOutcome {
        match (self.score1, self.score2) {
            (Some(s1), Some(s2)) if s1 == s2 => GameOutcome::Tied { runs: s1 },
            (Some(s1), Some(s2)) if s1 > s2 => GameOutcome::Won {
                winner: Side::Team1,
                winner_runs: s1,
                loser_runs: s2,
            },
            (Some(s1), Some(s2)) => GameOutcome::Won {
                winner: Side::Team2,
                winner_runs: s2,
                loser_runs: s1,
            },
            _ => GameOutcome::Unplayed,
        }
    }

    /// The winning team of a decided game with both teams assigned.
    pub fn winner(&self) -> Option<TeamId> {
        match self.outcome() {
            GameOutcome::Won { winner, .. } => self.team(winner),
            _ => None,
        }
    }

    /// Innings `side` spent on defense: half-innings the opponent completed
    /// at bat. `X` and blank cells do not count.
    pub fn defensive_innings(&self, side: Side) -> u32 {
        let batting = side.opponent().index();
        self.innings
            .iter()
            .filter(|inning| inning[batting].was_batted())
            .count() as u32
    }

    /// Whether any half-inning has been recorded on the line score.
    pub fn has_inning_data(&self) -> bool {
        self.innings
            .iter()
            .any(|inning| inning.iter().any(|cell| cell.was_batted()))
    }

    /// Runs on the line score for `side` (`X` and blanks count as zero).
    pub fn line_runs(&self, side: Side) -> u32 {
        let idx = side.index();
        self.innings.iter().map(|inning| inning[idx].runs()).sum()
    }

    /// R/H/E for `side`. Runs come from the final score when entered,
    /// otherwise from the line score.
    pub fn line_totals(&self, side: Side) -> LineTotals {
        let (hits, errors) = match side {
            Side::Team1 => (self.hits1, self.errors1),
            Side::Team2 => (self.hits2, self.errors2),
        };
        LineTotals {
            runs: self.score(side).unwrap_or_else(|| self.line_runs(side)),
            hits,
            errors,
        }
    }

    /// Enter one half-inning on the line score and keep the final score in
    /// step with it.
    ///
    /// The innings list grows to fit `index`. When the last inning is filled
    /// at or past regulation and the line score is level, a blank extra
    /// inning is appended.
    pub fn record_inning(&mut self, index: usize, side: Side, cell: InningCell, regulation_innings: usize) {
        if index >= self.innings.len() {
            self.innings.resize(index + 1, [InningCell::Pending; 2]);
        }
        self.innings[index][side.index()] = cell;

        let is_last = index + 1 == self.innings.len();
        if is_last
            && cell != InningCell::Pending
            && index + 1 >= regulation_innings
            && self.line_runs(Side::Team1) == self.line_runs(Side::Team2)
        {
            self.innings.push([InningCell::Pending; 2]);
        }

        self.recompute_score();
    }

    fn recompute_score(&mut self) {
        self.score1 = Some(self.line_runs(Side::Team1));
        self.score2 = Some(self.line_runs(Side::Team2));
    }

    /// Insert or replace the batting line for `stat.player_id`.
    pub fn upsert_batting_stat(&mut self, mut stat: BattingStat) {
        stat.game_id = self.id;
        match self.batting_stats.iter_mut().find(|s| s.player_id == stat.player_id) {
            Some(existing) => *existing = stat,
            None => self.batting_stats.push(stat),
        }
    }

    /// Insert or replace the pitching line for `stat.player_id`.
    pub fn upsert_pitching_stat(&mut self, mut stat: PitchingStat) {
        stat.game_id = self.id;
        match self.pitching_stats.iter_mut().find(|s| s.player_id == stat.player_id) {
            Some(existing) => *existing = stat,
            None => self.pitching_stats.push(stat),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
