// Plain-text and CSV renderings of standings, leader boards and the final.

use std::fmt::{self, Write};
use std::io;

use serde::Serialize;

use diamond_core::bracket::Matchup;
use diamond_core::display::{format_avg, format_era, format_gb, format_ip, format_pct, format_pos};
use diamond_core::leaders::{LeaderBoard, Leaders};
use diamond_core::model::{team_name, Game, Side, Team, TeamId};
use diamond_core::standings::Standing;

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

pub fn write_standings_table<W: Write>(
    out: &mut W,
    title: &str,
    generated: &str,
    teams: &[Team],
    table: &[Standing],
) -> fmt::Result {
    writeln!(out, "{title}")?;
    writeln!(out, "Standings as of {generated}")?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<7} {:<20} {:>3} {:>3} {:>6} {:>5} {:>4} {:>4} {:>5}",
        "POS", "TEAM", "W", "L", "PCT", "GB", "RS", "RA", "DIFF"
    )?;
    for s in table {
        writeln!(
            out,
            "{:<7} {:<20} {:>3} {:>3} {:>6} {:>5} {:>4} {:>4} {:>+5}",
            format_pos(s),
            team_name(teams, s.team_id),
            s.w,
            s.l,
            format_pct(s.pct),
            format_gb(s.gb),
            s.rs,
            s.ra,
            s.run_differential()
        )?;
    }
    if table.iter().any(|s| s.tied) {
        writeln!(out)?;
        writeln!(out, "(*) shares the position on won-lost record")?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct StandingRow<'a> {
    pos: usize,
    tied: bool,
    team_id: TeamId,
    team: &'a str,
    w: u32,
    l: u32,
    pct: String,
    gb: f64,
    rs: u32,
    ra: u32,
    diff: i64,
    tiebreak: String,
}

pub fn write_standings_csv<W: io::Write>(writer: W, teams: &[Team], table: &[Standing]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for s in table {
        wtr.serialize(StandingRow {
            pos: s.pos,
            tied: s.tied,
            team_id: s.team_id,
            team: team_name(teams, s.team_id),
            w: s.w,
            l: s.l,
            pct: format_pct(s.pct),
            gb: s.gb,
            rs: s.rs,
            ra: s.ra,
            diff: s.run_differential(),
            tiebreak: format!("{:?}", s.tiebreak),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Leader boards
// ---------------------------------------------------------------------------

pub fn write_leaders_table<W: Write>(out: &mut W, title: &str, generated: &str, board: &LeaderBoard) -> fmt::Result {
    writeln!(out, "{title}")?;
    writeln!(out, "Leaders as of {generated}")?;

    writeln!(out)?;
    writeln!(out, "BATTING (AVG)")?;
    match &board.batting {
        Leaders::Ranked(entries) => {
            writeln!(
                out,
                "{:>3}  {:<22} {:<16} {:>6} {:>3} {:>3} {:>3} {:>3}",
                "#", "PLAYER", "TEAM", "AVG", "PA", "AB", "H", "HR"
            )?;
            for (i, b) in entries.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}  {:<22} {:<16} {:>6} {:>3} {:>3} {:>3} {:>3}",
                    i + 1,
                    b.name,
                    b.team_name,
                    format_avg(b.avg),
                    b.plate_appearances,
                    b.at_bats,
                    b.hits,
                    b.home_runs
                )?;
            }
        }
        other => writeln!(out, "{}", empty_board_message(other))?,
    }

    writeln!(out)?;
    writeln!(out, "PITCHING (ERA)")?;
    match &board.pitching {
        Leaders::Ranked(entries) => {
            writeln!(
                out,
                "{:>3}  {:<22} {:<16} {:>6} {:>5} {:>3} {:>3} {:>5}",
                "#", "PLAYER", "TEAM", "ERA", "IP", "ER", "SO", "W-L"
            )?;
            for (i, p) in entries.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}  {:<22} {:<16} {:>6} {:>5} {:>3} {:>3} {:>5}",
                    i + 1,
                    p.name,
                    p.team_name,
                    format_era(p.era),
                    format_ip(p.innings_pitched),
                    p.earned_runs,
                    p.strike_outs,
                    format!("{}-{}", p.wins, p.losses)
                )?;
            }
        }
        other => writeln!(out, "{}", empty_board_message(other))?,
    }
    Ok(())
}

fn empty_board_message<T>(leaders: &Leaders<T>) -> &'static str {
    match leaders {
        Leaders::NoGamesPlayed => "No games have been completed yet.",
        Leaders::NoQualifiers | Leaders::Ranked(_) => "No players meet the qualifying minimum yet.",
    }
}

// ---------------------------------------------------------------------------
// Championship
// ---------------------------------------------------------------------------

pub fn write_final_summary<W: Write>(
    out: &mut W,
    teams: &[Team],
    matchup: Option<Matchup>,
    game: Option<&Game>,
    champion: Option<TeamId>,
) -> fmt::Result {
    match matchup {
        Some(m) => writeln!(
            out,
            "Championship: {} at {}",
            team_name(teams, m.visitor),
            team_name(teams, m.home)
        )?,
        None => writeln!(out, "Championship: to be decided when the round robin is complete")?,
    }

    if let Some(game) = game.filter(|g| g.is_complete()) {
        writeln!(out)?;
        writeln!(out, "{:<20} {:>3} {:>3} {:>3}", "", "R", "H", "E")?;
        for side in [Side::Team1, Side::Team2] {
            let totals = game.line_totals(side);
            let name = game.team(side).map_or("TBD", |id| team_name(teams, id));
            writeln!(
                out,
                "{:<20} {:>3} {:>3} {:>3}",
                name,
                totals.runs,
                totals.hits.map_or("-".to_string(), |h| h.to_string()),
                totals.errors.map_or("-".to_string(), |e| e.to_string())
            )?;
        }
    }

    if let Some(team_id) = champion {
        writeln!(out)?;
        writeln!(out, "Champion: {}", team_name(teams, team_id))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use diamond_core::config::TournamentConfig;
    use diamond_core::leaders::compute_leaders;
    use diamond_core::standings::compute_standings;

    fn league() -> (Vec<Team>, Vec<Game>) {
        let teams = vec![Team::new(1, "Halcones"), Team::new(2, "Toros"), Team::new(3, "Pumas")];
        let games = vec![
            Game::new(1, 1, 2).with_score(5, 3),
            Game::new(2, 2, 3).with_score(4, 2),
            Game::new(3, 3, 1).with_score(6, 1),
        ];
        (teams, games)
    }

    fn leaders_text(board: &LeaderBoard) -> String {
        let mut out = String::new();
        write_leaders_table(&mut out, "Torneo", "now", board).unwrap();
        out
    }

    #[test]
    fn table_lists_every_team_with_shared_rank_marker() {
        let (teams, games) = league();
        let table = compute_standings(&teams, &games).unwrap();
        let mut text = String::new();
        write_standings_table(&mut text, "Torneo", "2026-10-19 20:00", &teams, &table).unwrap();

        assert!(text.starts_with("Torneo\nStandings as of 2026-10-19 20:00\n"));
        assert!(text.contains("(*) 1"));
        assert!(text.contains("Pumas"));
        assert!(text.contains(".500"));
        assert!(text.contains("shares the position"));
    }

    #[test]
    fn csv_has_header_and_one_row_per_team() {
        let (teams, games) = league();
        let table = compute_standings(&teams, &games).unwrap();
        let mut buf = Vec::new();
        write_standings_csv(&mut buf, &teams, &table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "pos,tied,team_id,team,w,l,pct,gb,rs,ra,diff,tiebreak");
        assert!(lines[1].starts_with("1,true,3,Pumas,1,1,.500,0.0,"));
    }

    #[test]
    fn empty_boards_explain_themselves() {
        let (teams, _) = league();
        let board = compute_leaders(&teams, &[Game::new(1, 1, 2)], &TournamentConfig::default());
        assert!(leaders_text(&board).contains("BATTING (AVG)\nNo games have been completed yet."));

        let board = compute_leaders(&teams, &[Game::new(1, 1, 2).with_score(2, 1)], &TournamentConfig::default());
        assert!(leaders_text(&board).contains("PITCHING (ERA)\nNo players meet the qualifying minimum yet."));
    }

    #[test]
    fn final_summary_names_the_champion() {
        let (teams, _) = league();
        let matchup = Matchup { visitor: 2, home: 1 };
        let game = Game::new(16, 2, 1).with_score(3, 7);
        let mut text = String::new();
        write_final_summary(&mut text, &teams, Some(matchup), Some(&game), Some(1)).unwrap();

        assert!(text.contains("Championship: Toros at Halcones"));
        assert!(text.contains("Champion: Halcones"));

        let mut pending = String::new();
        write_final_summary(&mut pending, &teams, None, None, None).unwrap();
        assert!(pending.contains("to be decided"));
        assert!(!pending.contains("Champion:"));
    }
}
