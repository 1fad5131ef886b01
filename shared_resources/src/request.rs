use std::fmt;
use std::str::FromStr;

use crate::direction::Direction;
use crate::error::ParseError;
use crate::payload::{non_empty, number, split_fields};

/// A person waiting at `start_floor` who wants to go to `end_floor`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: String,
    pub start_floor: i32,
    pub end_floor: i32,
}

impl Request {
    pub fn new(id: impl Into<String>, start_floor: i32, end_floor: i32) -> Self {
        Request {
            id: id.into(),
            start_floor,
            end_floor,
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::required(self.start_floor, self.end_floor)
    }
}

/// Parses the backend's `id|start|end` form. Partial payloads are rejected
/// rather than filled in.
impl FromStr for Request {
    type Err = ParseError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let fields = split_fields(payload, 3)?;
        Ok(Request {
            id: non_empty("id", fields[0], payload)?.to_string(),
            start_floor: number("start_floor", non_empty("start_floor", fields[1], payload)?)?,
            end_floor: number("end_floor", non_empty("end_floor", fields[2], payload)?)?,
        })
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} -> {})", self.id, self.start_floor, self.end_floor)
    }
}
