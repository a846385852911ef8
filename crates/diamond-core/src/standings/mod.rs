// Standings engine: aggregate results, order, resolve ties, rank, games behind.
//
// Everything here is a pure function of the (teams, games) snapshot it is
// handed. Inputs are only borrowed and a fresh table is returned on every
// call.

pub mod tiebreak;

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::StandingsError;
use crate::model::{Game, GameOutcome, Side, Stage, Team, TeamId};

pub use tiebreak::Tiebreak;

// ---------------------------------------------------------------------------
// Standing
// ---------------------------------------------------------------------------

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub team_id: TeamId,
    /// 1-based competition rank; teams with the same won-lost record share it.
    pub pos: usize,
    pub w: u32,
    pub l: u32,
    /// Runs scored.
    pub rs: u32,
    /// Runs allowed.
    pub ra: u32,
    /// Winning fraction in `0.0..=1.0`.
    pub pct: f64,
    /// Games behind the leader, in half-game steps.
    pub gb: f64,
    /// Shares `pos` with a neighbouring row.
    pub tied: bool,
    /// How this team was placed within its won-lost group.
    pub tiebreak: Tiebreak,
}

impl Standing {
    fn new(team_id: TeamId) -> Self {
        Standing {
            team_id,
            pos: 0,
            w: 0,
            l: 0,
            rs: 0,
            ra: 0,
            pct: 0.0,
            gb: 0.0,
            tied: false,
            tiebreak: Tiebreak::NotNeeded,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.w + self.l
    }

    pub fn run_differential(&self) -> i64 {
        self.rs as i64 - self.ra as i64
    }

    pub fn record(&self) -> (u32, u32) {
        (self.w, self.l)
    }

    /// Winning percentage scaled for display: `.667` becomes 667.
    pub fn pct_thousandths(&self) -> u32 {
        (self.pct * 1000.0).round() as u32
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Compute the ranked standings table for the preliminary round.
///
/// Steps:
/// 1. Reject the snapshot if any preliminary game is recorded as a tie.
/// 2. Tally W/L/RS/RA for every game whose teams are both registered and
///    whose scores are both entered.
/// 3. Order by PCT desc, run differential desc, games played asc (stable).
/// 4. Reorder each run of adjacent teams sharing a won-lost record by
///    head-to-head wins, then run quotient, within the slots they hold.
/// 5. Assign competition ranks by won-lost record and games behind.
///
/// Championship games are ignored. Output rows are in final rank order.
pub fn compute_standings(teams: &[Team], games: &[Game]) -> Result<Vec<Standing>, StandingsError> {
    let round_robin: Vec<&Game> = games
        .iter()
        .filter(|g| g.stage == Stage::Preliminary)
        .collect();

    reject_ties(&round_robin)?;

    let mut table = aggregate(teams, &round_robin);
    table.sort_by(compare_primary);
    tiebreak::resolve_ties(&mut table, &round_robin);
    assign_ranks(&mut table);
    apply_games_behind(&mut table);
    mark_shared_ranks(&mut table);

    info!(
        "standings computed: {} teams, {} round-robin games",
        table.len(),
        round_robin.len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

fn reject_ties(games: &[&Game]) -> Result<(), StandingsError> {
    for game in games {
        if let GameOutcome::Tied { runs } = game.outcome() {
            warn!("game {} is tied {}-{}, withholding standings", game.id, runs, runs);
            return Err(StandingsError::TiedGame {
                game_id: game.id,
                runs,
            });
        }
    }
    Ok(())
}

fn aggregate(teams: &[Team], games: &[&Game]) -> Vec<Standing> {
    let mut table: Vec<Standing> = teams.iter().map(|t| Standing::new(t.id)).collect();
    let mut index: HashMap<TeamId, usize> = HashMap::with_capacity(teams.len());
    for (i, team) in teams.iter().enumerate() {
        index.entry(team.id).or_insert(i);
    }

    for game in games {
        let GameOutcome::Won {
            winner,
            winner_runs,
            loser_runs,
        } = game.outcome()
        else {
            continue;
        };
        let slot = |side: Side| game.team(side).and_then(|id| index.get(&id).copied());
        let (Some(win_idx), Some(loss_idx)) = (slot(winner), slot(winner.opponent())) else {
            debug!(
                "skipping game {}: team reference not registered ({:?} vs {:?})",
                game.id, game.team1, game.team2
            );
            continue;
        };

        let winner_row = &mut table[win_idx];
        winner_row.w += 1;
        winner_row.rs = winner_row.rs.saturating_add(winner_runs);
        winner_row.ra = winner_row.ra.saturating_add(loser_runs);

        let loser_row = &mut table[loss_idx];
        loser_row.l += 1;
        loser_row.rs = loser_row.rs.saturating_add(loser_runs);
        loser_row.ra = loser_row.ra.saturating_add(winner_runs);
    }

    for standing in &mut table {
        let played = standing.games_played();
        standing.pct = if played > 0 {
            standing.w as f64 / played as f64
        } else {
            0.0
        };
    }

    table
}

// ---------------------------------------------------------------------------
// Ordering and rank
// ---------------------------------------------------------------------------

/// PCT desc, run differential desc, games played asc.
fn compare_primary(a: &Standing, b: &Standing) -> Ordering {
    b.pct
        .total_cmp(&a.pct)
        .then_with(|| b.run_differential().cmp(&a.run_differential()))
        .then_with(|| a.games_played().cmp(&b.games_played()))
}

/// Competition ranking keyed on won-lost record: a row whose (W, L) matches
/// the row above shares its rank, otherwise it takes its 1-based index.
fn assign_ranks(table: &mut [Standing]) {
    let mut pos = 1;
    for i in 0..table.len() {
        if i > 0 && table[i].record() != table[i - 1].record() {
            pos = i + 1;
        }
        table[i].pos = pos;
    }
}

/// `((leader W - W) + (L - leader L)) / 2`. The leader and teams that have
/// not played yet report zero.
fn apply_games_behind(table: &mut [Standing]) {
    let Some((leader_w, leader_l)) = table.first().map(Standing::record) else {
        return;
    };
    for (i, standing) in table.iter_mut().enumerate() {
        standing.gb = if i == 0 || standing.games_played() == 0 {
            0.0
        } else {
            let wins_behind = leader_w as f64 - standing.w as f64;
            let losses_behind = standing.l as f64 - leader_l as f64;
            (wins_behind + losses_behind) / 2.0
        };
    }
}

fn mark_shared_ranks(table: &mut [Standing]) {
    for i in 0..table.len() {
        let pos = table[i].pos;
        let above = i > 0 && table[i - 1].pos == pos;
        let below = i + 1 < table.len() && table[i + 1].pos == pos;
        table[i].tied = above || below;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
