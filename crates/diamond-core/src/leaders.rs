// Rate-stat leader boards: batting average and ERA among qualified players.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::TournamentConfig;
use crate::model::{BattingStat, Game, InningsPitched, PitchingStat, Player, PlayerId, Side, Team, TeamId};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One leader board. "Nobody has played" and "nobody qualifies" are kept
/// apart so the caller can say which.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "leaders", rename_all = "snake_case")]
pub enum Leaders<T> {
    NoGamesPlayed,
    NoQualifiers,
    Ranked(Vec<T>),
}

impl<T> Leaders<T> {
    pub fn entries(&self) -> &[T] {
        match self {
            Leaders::Ranked(entries) => entries,
            Leaders::NoGamesPlayed | Leaders::NoQualifiers => &[],
        }
    }

    fn from_ranked(entries: Vec<T>) -> Self {
        if entries.is_empty() {
            Leaders::NoQualifiers
        } else {
            Leaders::Ranked(entries)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderBoard {
    pub batting: Leaders<BattingLeader>,
    pub pitching: Leaders<PitchingLeader>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingLeader {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    pub team_name: String,
    /// Hits per at-bat; zero without at-bats.
    pub avg: f64,
    pub games: u32,
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub runs: u32,
    pub rbi: u32,
    pub home_runs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchingLeader {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    pub team_name: String,
    /// Earned runs per regulation game; zero without outs recorded.
    pub era: f64,
    pub games: u32,
    pub innings_pitched: InningsPitched,
    pub earned_runs: u32,
    pub strike_outs: u32,
    pub wins: u32,
    pub losses: u32,
}

// ---------------------------------------------------------------------------
// Per-player totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct BattingTotals {
    games: u32,
    plate_appearances: u32,
    at_bats: u32,
    hits: u32,
    runs: u32,
    rbi: u32,
    home_runs: u32,
}

impl BattingTotals {
    fn add(&mut self, stat: &BattingStat) {
        self.games += 1;
        self.plate_appearances = self.plate_appearances.saturating_add(stat.plate_appearances);
        self.at_bats = self.at_bats.saturating_add(stat.at_bats);
        self.hits = self.hits.saturating_add(stat.hits);
        self.runs = self.runs.saturating_add(stat.runs);
        self.rbi = self.rbi.saturating_add(stat.rbi);
        self.home_runs = self.home_runs.saturating_add(stat.home_runs);
    }

    fn average(&self) -> f64 {
        if self.at_bats == 0 {
            0.0
        } else {
            self.hits as f64 / self.at_bats as f64
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PitchingTotals {
    games: u32,
    innings_pitched: InningsPitched,
    earned_runs: u32,
    strike_outs: u32,
    wins: u32,
    losses: u32,
}

impl PitchingTotals {
    fn add(&mut self, stat: &PitchingStat) {
        self.games += 1;
        self.innings_pitched = self.innings_pitched + stat.innings_pitched;
        self.earned_runs = self.earned_runs.saturating_add(stat.earned_runs);
        self.strike_outs = self.strike_outs.saturating_add(stat.strike_outs);
        self.wins = self.wins.saturating_add(stat.wins);
        self.losses = self.losses.saturating_add(stat.losses);
    }

    /// `ER * outs_per_game / outs`.
    fn era(&self, outs_per_game: u32) -> f64 {
        let outs = self.innings_pitched.outs();
        if outs == 0 {
            0.0
        } else {
            self.earned_runs as f64 * outs_per_game as f64 / outs as f64
        }
    }
}

struct PlayerTotals<'a> {
    player: &'a Player,
    team: &'a Team,
    batting: BattingTotals,
    pitching: PitchingTotals,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Build both leader boards from every stat line in `games`.
///
/// A player qualifies when their team has completed at least one game and
/// they reach the per-game threshold from `config.leaderboard`: plate
/// appearances for batters, innings pitched (counted in outs) for pitchers.
/// Batters rank by AVG desc then HR desc; pitchers by ERA asc then SO desc.
pub fn compute_leaders(teams: &[Team], games: &[Game], config: &TournamentConfig) -> LeaderBoard {
    let team_games = team_games_played(games);
    if team_games.values().all(|&n| n == 0) {
        return LeaderBoard {
            batting: Leaders::NoGamesPlayed,
            pitching: Leaders::NoGamesPlayed,
        };
    }

    let totals = aggregate_players(teams, games);
    let rules = &config.leaderboard;
    let games_for = |team_id: TeamId| team_games.get(&team_id).copied().unwrap_or(0);

    let mut batting: Vec<BattingLeader> = totals
        .iter()
        .filter(|t| {
            let team_games = games_for(t.team.id);
            team_games > 0 && t.batting.plate_appearances as f64 >= rules.min_pa_per_game * team_games as f64
        })
        .map(|t| BattingLeader {
            player_id: t.player.id,
            name: t.player.name.clone(),
            team_id: t.team.id,
            team_name: t.team.name.clone(),
            avg: t.batting.average(),
            games: t.batting.games,
            plate_appearances: t.batting.plate_appearances,
            at_bats: t.batting.at_bats,
            hits: t.batting.hits,
            runs: t.batting.runs,
            rbi: t.batting.rbi,
            home_runs: t.batting.home_runs,
        })
        .collect();
    batting.sort_by(compare_batting);
    batting.truncate(rules.limit);

    let outs_per_game = config.outs_per_game();
    let mut pitching: Vec<PitchingLeader> = totals
        .iter()
        .filter(|t| {
            let team_games = games_for(t.team.id);
            team_games > 0 && t.pitching.innings_pitched.innings() >= rules.min_ip_per_game * team_games as f64
        })
        .map(|t| PitchingLeader {
            player_id: t.player.id,
            name: t.player.name.clone(),
            team_id: t.team.id,
            team_name: t.team.name.clone(),
            era: t.pitching.era(outs_per_game),
            games: t.pitching.games,
            innings_pitched: t.pitching.innings_pitched,
            earned_runs: t.pitching.earned_runs,
            strike_outs: t.pitching.strike_outs,
            wins: t.pitching.wins,
            losses: t.pitching.losses,
        })
        .collect();
    pitching.sort_by(compare_pitching);
    pitching.truncate(rules.limit);

    info!(
        "leader boards computed: {} batting qualifiers, {} pitching qualifiers",
        batting.len(),
        pitching.len()
    );

    LeaderBoard {
        batting: Leaders::from_ranked(batting),
        pitching: Leaders::from_ranked(pitching),
    }
}

/// Completed games per team id (both scores entered).
pub fn team_games_played(games: &[Game]) -> HashMap<TeamId, u32> {
    let mut counts = HashMap::new();
    for game in games.iter().filter(|g| g.is_complete()) {
        for side in [Side::Team1, Side::Team2] {
            if let Some(team_id) = game.team(side) {
                *counts.entry(team_id).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Totals for every rostered player, in roster order.
fn aggregate_players<'a>(teams: &'a [Team], games: &[Game]) -> Vec<PlayerTotals<'a>> {
    let mut totals = Vec::new();
    let mut index: HashMap<PlayerId, usize> = HashMap::new();
    for team in teams {
        for player in &team.players {
            index.entry(player.id).or_insert_with(|| {
                totals.push(PlayerTotals {
                    player,
                    team,
                    batting: BattingTotals::default(),
                    pitching: PitchingTotals::default(),
                });
                totals.len() - 1
            });
        }
    }

    for game in games {
        for stat in &game.batting_stats {
            match index.get(&stat.player_id) {
                Some(&i) => totals[i].batting.add(stat),
                None => debug!("game {}: batting line for unrostered player {}", game.id, stat.player_id),
            }
        }
        for stat in &game.pitching_stats {
            match index.get(&stat.player_id) {
                Some(&i) => totals[i].pitching.add(stat),
                None => debug!("game {}: pitching line for unrostered player {}", game.id, stat.player_id),
            }
        }
    }

    totals
}

fn compare_batting(a: &BattingLeader, b: &BattingLeader) -> Ordering {
    b.avg.total_cmp(&a.avg).then_with(|| b.home_runs.cmp(&a.home_runs))
}

fn compare_pitching(a: &PitchingLeader, b: &PitchingLeader) -> Ordering {
    a.era.total_cmp(&b.era).then_with(|| b.strike_outs.cmp(&a.strike_outs))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn player(id: PlayerId, name: &str) -> Player {
        Player {
            id,
            number: id,
            name: name.into(),
            role: String::new(),
            place_of_birth: String::new(),
        }
    }

    fn roster() -> Vec<Team> {
        let mut home = Team::new(1, "Halcones");
        home.players = vec![player(11, "Ortega"), player(12, "Benitez"), player(13, "Sosa")];
        let mut away = Team::new(2, "Toros");
        away.players = vec![player(21, "Medina"), player(22, "Ruiz")];
        vec![home, away]
    }

    fn bat(player_id: PlayerId, pa: u32, ab: u32, h: u32, hr: u32) -> BattingStat {
        BattingStat {
            player_id,
            plate_appearances: pa,
            at_bats: ab,
            hits: h,
            home_runs: hr,
            ..Default::default()
        }
    }

    fn pitch(player_id: PlayerId, ip: f64, er: u32, so: u32) -> PitchingStat {
        PitchingStat {
            player_id,
            innings_pitched: InningsPitched::from_notation(ip),
            earned_runs: er,
            strike_outs: so,
            ..Default::default()
        }
    }

    #[test]
    fn no_completed_games_is_distinct_from_no_qualifiers() {
        let mut game = Game::new(1, 1, 2);
        game.upsert_batting_stat(bat(11, 4, 4, 2, 0));
        let board = compute_leaders(&roster(), &[game], &TournamentConfig::default());
        assert_eq!(board.batting, Leaders::NoGamesPlayed);
        assert_eq!(board.pitching, Leaders::NoGamesPlayed);

        let game = Game::new(1, 1, 2).with_score(3, 2);
        let board = compute_leaders(&roster(), &[game], &TournamentConfig::default());
        assert_eq!(board.batting, Leaders::NoQualifiers);
        assert_eq!(board.pitching, Leaders::NoQualifiers);
        assert!(board.batting.entries().is_empty());
    }

    #[test]
    fn batting_ranks_by_average_then_home_runs() {
        let mut game = Game::new(1, 1, 2).with_score(3, 2);
        game.upsert_batting_stat(bat(11, 4, 4, 2, 0)); // .500
        game.upsert_batting_stat(bat(12, 4, 4, 2, 1)); // .500, 1 HR
        game.upsert_batting_stat(bat(21, 3, 3, 3, 0)); // 1.000
        game.upsert_batting_stat(bat(22, 2, 2, 2, 2)); // under 2.1 PA
        let board = compute_leaders(&roster(), &[game], &TournamentConfig::default());
        let ids: Vec<PlayerId> = board.batting.entries().iter().map(|l| l.player_id).collect();
        assert_eq!(ids, vec![21, 12, 11]);
        assert_eq!(board.batting.entries()[0].team_name, "Toros");
        assert!(approx_eq(board.batting.entries()[1].avg, 0.5, 1e-12));
    }

    #[test]
    fn zero_at_bats_is_zero_average() {
        let mut game = Game::new(1, 1, 2).with_score(3, 2);
        game.upsert_batting_stat(bat(11, 3, 0, 0, 0));
        let board = compute_leaders(&roster(), &[game], &TournamentConfig::default());
        assert_eq!(board.batting.entries()[0].avg, 0.0);
    }

    #[test]
    fn pitching_ranks_by_era_then_strikeouts() {
        let mut game = Game::new(1, 1, 2).with_score(3, 2);
        game.upsert_pitching_stat(pitch(11, 4.0, 2, 3)); // 12 outs, ERA 3.50
        game.upsert_pitching_stat(pitch(12, 3.0, 0, 1)); // 9 outs, ERA 0.00
        game.upsert_pitching_stat(pitch(21, 7.0, 0, 9)); // 21 outs, ERA 0.00
        game.upsert_pitching_stat(pitch(22, 2.0, 0, 4)); // 6 outs, under 2.3 IP
        let board = compute_leaders(&roster(), &[game], &TournamentConfig::default());
        let ids: Vec<PlayerId> = board.pitching.entries().iter().map(|l| l.player_id).collect();
        assert_eq!(ids, vec![21, 12, 11]);
        assert!(approx_eq(board.pitching.entries()[2].era, 3.5, 1e-12));
    }

    #[test]
    fn innings_are_summed_in_outs() {
        let games = vec![
            {
                let mut g = Game::new(1, 1, 2).with_score(3, 2);
                g.upsert_pitching_stat(pitch(11, 2.2, 1, 2));
                g
            },
            {
                let mut g = Game::new(2, 1, 2).with_score(1, 0);
                g.upsert_pitching_stat(pitch(11, 2.2, 0, 3));
                g
            },
        ];
        let board = compute_leaders(&roster(), &games, &TournamentConfig::default());
        let leader = &board.pitching.entries()[0];
        // 8 + 8 = 16 outs = 5.1 innings; needs 2.3 * 2 = 4.6 innings.
        assert_eq!(leader.innings_pitched.outs(), 16);
        assert_eq!(leader.innings_pitched.to_string(), "5.1");
        assert_eq!(leader.games, 2);
        assert!(approx_eq(leader.era, 21.0 / 16.0, 1e-12));
    }

    #[test]
    fn limit_truncates_board() {
        let mut game = Game::new(1, 1, 2).with_score(3, 2);
        for id in [11, 12, 13, 21, 22] {
            game.upsert_batting_stat(bat(id, 3, 3, 1, 0));
        }
        let mut config = TournamentConfig::default();
        config.leaderboard.limit = 2;
        let board = compute_leaders(&roster(), &[game], &config);
        assert_eq!(board.batting.entries().len(), 2);
        // Equal AVG and HR keep roster order.
        assert_eq!(board.batting.entries()[0].player_id, 11);
    }

    #[test]
    fn era_of_huge_earned_run_totals_does_not_overflow() {
        let mut game = Game::new(1, 1, 2).with_score(3, 2);
        game.upsert_pitching_stat(pitch(11, 7.0, u32::MAX, 0));
        let board = compute_leaders(&roster(), &[game], &TournamentConfig::default());
        let leader = &board.pitching.entries()[0];
        assert_eq!(leader.earned_runs, u32::MAX);
        assert!(approx_eq(leader.era, u32::MAX as f64, 1e-3));
    }

    #[test]
    fn unrostered_lines_are_ignored() {
        let mut game = Game::new(1, 1, 2).with_score(3, 2);
        game.upsert_batting_stat(bat(999, 5, 5, 5, 5));
        let board = compute_leaders(&roster(), &[game], &TournamentConfig::default());
        assert_eq!(board.batting, Leaders::NoQualifiers);
    }

    #[test]
    fn team_games_count_only_completed_games() {
        let games = vec![
            Game::new(1, 1, 2).with_score(3, 2),
            Game::new(2, 1, 3).with_score(1, 0),
            Game::new(3, 2, 3),
        ];
        let counts = team_games_played(&games);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), Some(&1));
    }
}
