use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Direction state reported by a carrier, or required by a request.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Idle,
    Ascending,
    Descending,
}

impl Direction {
    /// Direction a passenger travelling from `start` to `end` needs.
    /// A same-floor trip counts as ascending.
    pub fn required(start: i32, end: i32) -> Self {
        if end >= start {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim() {
            "S" => Ok(Direction::Idle),
            "U" => Ok(Direction::Ascending),
            "D" => Ok(Direction::Descending),
            other => Err(ParseError::UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Idle => "idle",
            Direction::Ascending => "up",
            Direction::Descending => "down",
        };
        f.write_str(name)
    }
}
