// Scoreboard-style formatting for standings and leader rows.

use crate::model::InningsPitched;
use crate::standings::Standing;

/// Winning percentage the way a standings page prints it: `.667`, `.000`,
/// `1.000`.
pub fn format_pct(pct: f64) -> String {
    let thousandths = (pct * 1000.0).round() as u32;
    if thousandths >= 1000 {
        "1.000".to_string()
    } else {
        format!(".{thousandths:03}")
    }
}

/// Games behind: `-` for zero, otherwise one decimal place.
pub fn format_gb(gb: f64) -> String {
    if gb == 0.0 {
        "-".to_string()
    } else {
        format!("{gb:.1}")
    }
}

/// Rank column, prefixed with `(*)` when the rank is shared.
pub fn format_pos(standing: &Standing) -> String {
    if standing.tied {
        format!("(*) {}", standing.pos)
    } else {
        standing.pos.to_string()
    }
}

/// Batting average without the leading zero: `.333`, `1.000`.
pub fn format_avg(avg: f64) -> String {
    let text = format!("{avg:.3}");
    match text.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

pub fn format_era(era: f64) -> String {
    format!("{era:.2}")
}

pub fn format_ip(ip: InningsPitched) -> String {
    ip.to_string()
}
