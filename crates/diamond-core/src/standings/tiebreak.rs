// Ordering inside a group of teams with the same won-lost record.
//
// Criteria, evaluated only over games played between members of the group:
// 1. head-to-head wins (more is better)
// 2. run quotient: (runs scored - runs allowed) / defensive innings
// 3. otherwise the primary order is kept
//
// A group is a run of adjacent rows with the same won-lost record after the
// primary sort. Members only trade places inside that run, so teams outside
// the group never move.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::Standing;
use crate::model::{Game, GameOutcome, Side, TeamId};

/// Which criterion placed a team inside its won-lost group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tiebreak {
    /// The team's record is unique.
    #[default]
    NotNeeded,
    HeadToHead,
    RunQuotient,
    /// Still level after every criterion (or no head-to-head data); the
    /// primary order stands.
    Unresolved,
}

/// One tied team's results against the rest of its group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct GroupRecord {
    wins: u32,
    runs_scored: u32,
    runs_allowed: u32,
    defensive_innings: u32,
}

impl GroupRecord {
    /// `rs / innings - ra / innings`, or zero without inning data.
    fn run_quotient(&self) -> f64 {
        if self.defensive_innings == 0 {
            return 0.0;
        }
        let innings = self.defensive_innings as f64;
        self.runs_scored as f64 / innings - self.runs_allowed as f64 / innings
    }
}

/// Reorder every run of two or more adjacent teams sharing a won-lost record
/// in `table`, which must already be in primary order.
pub(super) fn resolve_ties(table: &mut [Standing], games: &[&Game]) {
    let mut start = 0;
    while start < table.len() {
        let record = table[start].record();
        let len = table[start..]
            .iter()
            .take_while(|s| s.record() == record)
            .count();
        let end = start + len;
        if len > 1 {
            let ordered = order_group(table[start..end].to_vec(), games);
            table[start..end].clone_from_slice(&ordered);
        }
        start = end;
    }
}

fn order_group(mut members: Vec<Standing>, games: &[&Game]) -> Vec<Standing> {
    let ids: HashSet<TeamId> = members.iter().map(|s| s.team_id).collect();
    let group_games: Vec<&Game> = games
        .iter()
        .copied()
        .filter(|g| {
            matches!(g.outcome(), GameOutcome::Won { .. })
                && g.team1.is_some_and(|id| ids.contains(&id))
                && g.team2.is_some_and(|id| ids.contains(&id))
        })
        .collect();

    if group_games.is_empty() {
        debug!(
            "no head-to-head games among {:?}, keeping primary order",
            members.iter().map(|s| s.team_id).collect::<Vec<_>>()
        );
        for member in &mut members {
            member.tiebreak = Tiebreak::Unresolved;
        }
        return members;
    }

    let records = group_records(&group_games);
    let use_quotient = group_games.iter().all(|g| g.has_inning_data());
    if !use_quotient {
        debug!("incomplete line scores in tied group, run quotient skipped");
    }

    let record_of = |team_id: TeamId| records.get(&team_id).copied().unwrap_or_default();
    let quotient_of = |team_id: TeamId| {
        if use_quotient {
            record_of(team_id).run_quotient()
        } else {
            0.0
        }
    };

    // Stable: members that stay level keep their primary order.
    members.sort_by(|a, b| {
        let (ra, rb) = (record_of(a.team_id), record_of(b.team_id));
        rb.wins
            .cmp(&ra.wins)
            .then_with(|| quotient_of(b.team_id).total_cmp(&quotient_of(a.team_id)))
    });

    let labels: Vec<Tiebreak> = members
        .iter()
        .map(|m| {
            let wins = record_of(m.team_id).wins;
            let quotient = quotient_of(m.team_id);
            let same_wins: Vec<&Standing> = members
                .iter()
                .filter(|o| o.team_id != m.team_id && record_of(o.team_id).wins == wins)
                .collect();
            if same_wins.is_empty() {
                Tiebreak::HeadToHead
            } else if use_quotient
                && same_wins
                    .iter()
                    .all(|o| quotient_of(o.team_id).total_cmp(&quotient).is_ne())
            {
                Tiebreak::RunQuotient
            } else {
                Tiebreak::Unresolved
            }
        })
        .collect();
    for (member, label) in members.iter_mut().zip(labels) {
        member.tiebreak = label;
    }

    debug!(
        "tied group ordered: {:?}",
        members
            .iter()
            .map(|s| (s.team_id, s.tiebreak))
            .collect::<Vec<_>>()
    );
    members
}

fn group_records(group_games: &[&Game]) -> HashMap<TeamId, GroupRecord> {
    let mut records: HashMap<TeamId, GroupRecord> = HashMap::new();
    for game in group_games {
        let GameOutcome::Won { winner, .. } = game.outcome() else {
            continue;
        };
        for side in [Side::Team1, Side::Team2] {
            let (Some(team_id), Some(scored), Some(allowed)) =
                (game.team(side), game.score(side), game.score(side.opponent()))
            else {
                continue;
            };
            let record = records.entry(team_id).or_default();
            if side == winner {
                record.wins += 1;
            }
            record.runs_scored = record.runs_scored.saturating_add(scored);
            record.runs_allowed = record.runs_allowed.saturating_add(allowed);
            record.defensive_innings += game.defensive_innings(side);
        }
    }
    records
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Inning, InningCell, Team};
    use crate::standings::compute_standings;

    fn teams(ids: &[TeamId]) -> Vec<Team> {
        ids.iter().map(|&id| Team::new(id, format!("Team {id}"))).collect()
    }

    /// A seven-inning line score: all runs in the first inning, zeros after.
    fn seven_innings(runs1: u32, runs2: u32) -> Vec<Inning> {
        let mut innings = vec![[InningCell::Runs(runs1), InningCell::Runs(runs2)]];
        innings.extend(vec![[InningCell::Runs(0), InningCell::Runs(0)]; 6]);
        innings
    }

    #[test]
    fn run_quotient_is_zero_without_innings() {
        let record = GroupRecord {
            wins: 1,
            runs_scored: 10,
            runs_allowed: 2,
            defensive_innings: 0,
        };
        assert_eq!(record.run_quotient(), 0.0);

        let record = GroupRecord {
            defensive_innings: 4,
            ..record
        };
        assert!((record.run_quotient() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn head_to_head_beats_run_differential() {
        // 1 and 2 are both 1-1; 1 won their meeting, 2 has the far better
        // overall differential.
        let games = vec![
            Game::new(1, 1, 2).with_score(2, 1),
            Game::new(2, 3, 1).with_score(10, 0),
            Game::new(3, 2, 4).with_score(20, 0),
        ];
        let table = compute_standings(&teams(&[1, 2, 3, 4]), &games).unwrap();
        let order: Vec<TeamId> = table.iter().map(|s| s.team_id).collect();
        assert_eq!(order, vec![3, 1, 2, 4]);
        assert_eq!(table[1].tiebreak, Tiebreak::HeadToHead);
        assert_eq!(table[2].tiebreak, Tiebreak::HeadToHead);
        assert_eq!(table[0].tiebreak, Tiebreak::NotNeeded);
        // Rank still follows the shared record.
        let pos: Vec<usize> = table.iter().map(|s| s.pos).collect();
        assert_eq!(pos, vec![1, 2, 2, 4]);
    }

    /// 1 and 2 split their two meetings and are both 2-1. 1 won the series
    /// on runs; 2 ran up a big win elsewhere.
    fn split_series(with_line_scores: bool) -> Vec<Game> {
        let mut first = Game::new(1, 1, 2).with_score(5, 1);
        let mut second = Game::new(2, 1, 2).with_score(1, 2);
        if with_line_scores {
            first = first.with_innings(seven_innings(5, 1));
            // Home side 2 leads after the top of the 7th and skips its half.
            let mut innings = vec![[InningCell::Runs(0), InningCell::Runs(0)]; 6];
            innings[0] = [InningCell::Runs(1), InningCell::Runs(2)];
            innings.push([InningCell::Runs(0), InningCell::NotPlayed]);
            second = second.with_innings(innings);
        }
        vec![
            first,
            second,
            Game::new(3, 1, 3).with_score(1, 0),
            Game::new(4, 2, 4).with_score(15, 0),
        ]
    }

    #[test]
    fn run_quotient_settles_split_series() {
        let games = split_series(true);
        assert_eq!(games[1].score2, Some(2));
        let table = compute_standings(&teams(&[1, 2, 3, 4]), &games).unwrap();
        assert_eq!(table[0].team_id, 1);
        assert_eq!(table[1].team_id, 2);
        assert_eq!(table[0].tiebreak, Tiebreak::RunQuotient);
        assert_eq!(table[1].tiebreak, Tiebreak::RunQuotient);
        assert_eq!((table[0].pos, table[1].pos), (1, 1));
        assert!(table[0].tied && table[1].tied);
    }

    #[test]
    fn missing_line_scores_fall_back_to_primary_order() {
        let games = split_series(false);
        let table = compute_standings(&teams(&[1, 2, 3, 4]), &games).unwrap();
        // Primary order: 2 has the better overall differential (+12 vs +4).
        assert_eq!(table[0].team_id, 2);
        assert_eq!(table[1].team_id, 1);
        assert_eq!(table[0].tiebreak, Tiebreak::Unresolved);
        assert_eq!(table[1].tiebreak, Tiebreak::Unresolved);
    }

    #[test]
    fn group_members_keep_their_slots() {
        // 5 is 2-0, 3 is 0-2, and 1, 2, 4 are all 1-1.
        let games = vec![
            Game::new(1, 2, 1).with_score(3, 2),
            Game::new(2, 1, 3).with_score(9, 0),
            Game::new(3, 4, 2).with_score(1, 0),
            Game::new(4, 5, 3).with_score(4, 0),
            Game::new(5, 5, 4).with_score(4, 0),
        ];
        let table = compute_standings(&teams(&[1, 2, 3, 4, 5]), &games).unwrap();
        let order: Vec<TeamId> = table.iter().map(|s| s.team_id).collect();
        // Primary order of the 1-1 group is 1 (+8), 2 (0), 4 (-3). Inside the
        // group 2 beat 1 and 4 beat 2, so 1 drops to the group's last row.
        assert_eq!(order, vec![5, 2, 4, 1, 3]);
        assert_eq!(table[3].tiebreak, Tiebreak::HeadToHead);
        assert!(table[1..4].iter().all(|s| s.pos == 2));
    }

    #[test]
    fn same_record_split_by_another_record_is_not_a_group() {
        // 1 and 3 are both 1-1 and 3 won their meeting, but 2 sits between
        // them at the same PCT with a 2-2 record and a better differential.
        let games = vec![
            Game::new(1, 3, 1).with_score(3, 0),
            Game::new(2, 1, 4).with_score(9, 1),
            Game::new(3, 5, 3).with_score(2, 0),
            Game::new(4, 2, 4).with_score(6, 1),
            Game::new(5, 2, 5).with_score(3, 1),
            Game::new(6, 4, 2).with_score(2, 0),
            Game::new(7, 5, 2).with_score(3, 1),
        ];
        let table = compute_standings(&teams(&[1, 2, 3, 4, 5]), &games).unwrap();
        let order: Vec<TeamId> = table.iter().map(|s| s.team_id).collect();
        assert_eq!(order, vec![5, 1, 2, 3, 4]);

        let diffs: Vec<i64> = table[1..4].iter().map(|s| s.run_differential()).collect();
        assert_eq!(diffs, vec![5, 3, 1]);
        let pos: Vec<usize> = table.iter().map(|s| s.pos).collect();
        assert_eq!(pos, vec![1, 2, 3, 4, 5]);
        assert!(table.iter().all(|s| s.tiebreak == Tiebreak::NotNeeded && !s.tied));
    }
}
