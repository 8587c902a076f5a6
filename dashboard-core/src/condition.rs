use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic weather category derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Fog,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Fog => "Fog",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Clouds,
            Condition::Rain,
            Condition::Snow,
            Condition::Thunderstorm,
            Condition::Fog,
        ]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a weather code to its condition. Codes outside every known range are `Clear`.
pub const fn classify(code: i64) -> Condition {
    match code {
        0 => Condition::Clear,
        1..=3 => Condition::Clouds,
        45..=48 => Condition::Fog,
        51..=67 | 80..=82 => Condition::Rain,
        71..=77 => Condition::Snow,
        95..=99 => Condition::Thunderstorm,
        _ => Condition::Clear,
    }
}
