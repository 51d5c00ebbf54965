use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed palette for card labels. Anything outside this set is rejected
/// at the write boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl LabelColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelColor::Red => "red",
            LabelColor::Orange => "orange",
            LabelColor::Yellow => "yellow",
            LabelColor::Green => "green",
            LabelColor::Blue => "blue",
            LabelColor::Purple => "purple",
            LabelColor::Pink => "pink",
        }
    }

    pub fn all() -> &'static [LabelColor] {
        &[
            LabelColor::Red,
            LabelColor::Orange,
            LabelColor::Yellow,
            LabelColor::Green,
            LabelColor::Blue,
            LabelColor::Purple,
            LabelColor::Pink,
        ]
    }
}

impl fmt::Display for LabelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LabelColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(LabelColor::Red),
            "orange" => Ok(LabelColor::Orange),
            "yellow" => Ok(LabelColor::Yellow),
            "green" => Ok(LabelColor::Green),
            "blue" => Ok(LabelColor::Blue),
            "purple" => Ok(LabelColor::Purple),
            "pink" => Ok(LabelColor::Pink),
            _ => Err(format!("Invalid label color: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_color() {
        for color in LabelColor::all() {
            assert_eq!(color.as_str().parse::<LabelColor>().unwrap(), *color);
        }
    }

    #[test]
    fn unknown_color_is_rejected() {
        assert!("magenta".parse::<LabelColor>().is_err());
    }
}
