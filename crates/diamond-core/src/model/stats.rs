// Per-player, per-game box score lines.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::game::GameId;
use super::team::PlayerId;
use crate::serde_utils::NumberOrText;

// ---------------------------------------------------------------------------
// Innings pitched
// ---------------------------------------------------------------------------

/// Innings pitched, held as total outs recorded.
///
/// Box scores write innings pitched in baseball notation: the integer part is
/// whole innings and the first decimal digit is outs within the next inning,
/// so `4.2` is four innings and two outs (14 outs), not 4.2 innings. Sums are
/// always taken in outs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct InningsPitched {
    outs: u32,
}

impl InningsPitched {
    pub const fn from_outs(outs: u32) -> Self {
        InningsPitched { outs }
    }

    /// Parse baseball notation (`4.2` = 14 outs). Negative or non-finite
    /// values count as zero.
    pub fn from_notation(ip: f64) -> Self {
        if !ip.is_finite() || ip <= 0.0 {
            return InningsPitched::default();
        }
        let whole = ip.floor();
        let extra_outs = ((ip - whole) * 10.0).round() as u32;
        InningsPitched {
            outs: (whole as u32).saturating_mul(3).saturating_add(extra_outs),
        }
    }

    pub fn outs(self) -> u32 {
        self.outs
    }

    /// Innings as a real number (14 outs = 4.666...), for rate thresholds.
    pub fn innings(self) -> f64 {
        self.outs as f64 / 3.0
    }

    /// Back to baseball notation: `floor(outs / 3) + (outs % 3) / 10`.
    pub fn to_notation(self) -> f64 {
        (self.outs / 3) as f64 + (self.outs % 3) as f64 / 10.0
    }
}

impl Add for InningsPitched {
    type Output = InningsPitched;

    fn add(self, rhs: InningsPitched) -> InningsPitched {
        InningsPitched::from_outs(self.outs.saturating_add(rhs.outs))
    }
}

impl Sum for InningsPitched {
    fn sum<I: Iterator<Item = InningsPitched>>(iter: I) -> Self {
        iter.fold(InningsPitched::default(), Add::add)
    }
}

impl fmt::Display for InningsPitched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.outs / 3, self.outs % 3)
    }
}

impl Serialize for InningsPitched {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_notation())
    }
}

impl<'de> Deserialize<'de> for InningsPitched {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<NumberOrText>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(NumberOrText::to_f64)
            .map(InningsPitched::from_notation)
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Stat lines
// ---------------------------------------------------------------------------

/// One batter's line in one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BattingStat {
    pub player_id: PlayerId,
    pub game_id: GameId,
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub runs: u32,
    pub rbi: u32,
    pub home_runs: u32,
    pub walks: u32,
    pub strike_outs: u32,
}

/// One pitcher's line in one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PitchingStat {
    pub player_id: PlayerId,
    pub game_id: GameId,
    pub innings_pitched: InningsPitched,
    pub hits: u32,
    pub runs: u32,
    pub earned_runs: u32,
    pub walks: u32,
    pub strike_outs: u32,
    pub wins: u32,
    pub losses: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notation_converts_to_outs() {
        assert_eq!(InningsPitched::from_notation(4.2).outs(), 14);
        assert_eq!(InningsPitched::from_notation(7.0).outs(), 21);
        assert_eq!(InningsPitched::from_notation(0.1).outs(), 1);
        assert_eq!(InningsPitched::from_notation(-1.0).outs(), 0);
        assert_eq!(InningsPitched::from_notation(f64::NAN).outs(), 0);
    }

    #[test]
    fn sums_carry_outs_into_innings() {
        // 2.2 + 1.1 = 8 + 4 = 12 outs = 4.0, not 3.3
        let total: InningsPitched = [2.2, 1.1]
            .into_iter()
            .map(InningsPitched::from_notation)
            .sum();
        assert_eq!(total.outs(), 12);
        assert_eq!(total.to_string(), "4.0");
        assert!((total.to_notation() - 4.0).abs() < 1e-10);

        let total = InningsPitched::from_notation(2.2) + InningsPitched::from_notation(2.2);
        assert_eq!(total.to_string(), "5.1");
        assert!((total.to_notation() - 5.1).abs() < 1e-10);
    }

    #[test]
    fn huge_values_saturate_instead_of_overflowing() {
        assert_eq!(InningsPitched::from_notation(1e12).outs(), u32::MAX);
        let total = InningsPitched::from_outs(u32::MAX) + InningsPitched::from_outs(3);
        assert_eq!(total.outs(), u32::MAX);
    }

    #[test]
    fn innings_is_real_valued() {
        let ip = InningsPitched::from_outs(14);
        assert!((ip.innings() - 14.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn pitching_line_accepts_string_innings() {
        let json = r#"{"playerId": 5, "gameId": 2, "inningsPitched": "3.1", "earnedRuns": 2, "strikeOuts": 4}"#;
        let stat: PitchingStat = serde_json::from_str(json).unwrap();
        assert_eq!(stat.innings_pitched.outs(), 10);
        assert_eq!(stat.earned_runs, 2);
        assert_eq!(stat.strike_outs, 4);
        assert_eq!(stat.wins, 0);
    }

    #[test]
    fn batting_line_defaults_missing_counters() {
        let json = r#"{"playerId": 5, "gameId": 2, "atBats": 3, "hits": 1}"#;
        let stat: BattingStat = serde_json::from_str(json).unwrap();
        assert_eq!(stat.at_bats, 3);
        assert_eq!(stat.hits, 1);
        assert_eq!(stat.plate_appearances, 0);
    }
}
