// Lenient deserializers for the loosely-typed fields produced by score entry
// forms: values arrive as numbers, numeric strings, or empty strings.

use serde::{Deserialize, Deserializer};

/// Any scalar a score or identifier field may hold on the wire.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrText {
    Int(u64),
    Float(f64),
    Text(String),
}

impl NumberOrText {
    /// Interpret the value as a non-negative whole number. Blank or
    /// non-numeric text, negatives, and fractions yield `None`.
    pub(crate) fn to_u32(&self) -> Option<u32> {
        match self {
            NumberOrText::Int(n) => u32::try_from(*n).ok(),
            NumberOrText::Float(f) => {
                if f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64 {
                    Some(*f as u32)
                } else {
                    None
                }
            }
            NumberOrText::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }

    /// Interpret the value as a real number; blank or garbage text is `None`.
    pub(crate) fn to_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Int(n) => Some(*n as f64),
            NumberOrText::Float(f) => Some(*f).filter(|f| f.is_finite()),
            NumberOrText::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }
}

/// Deserialize an optional whole number from a number, a numeric string,
/// `""`, or `null`. Anything unparseable becomes `None` rather than an error,
/// so a half-typed score reads as "not yet played".
pub fn optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(NumberOrText::to_u32))
}
