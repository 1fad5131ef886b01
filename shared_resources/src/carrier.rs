use std::str::FromStr;

use log::warn;

use crate::direction::Direction;
use crate::error::ParseError;
use crate::payload::{non_empty, number, split_fields};
use crate::request::Request;

/// Fixed description of a carrier, as read from the roster.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CarrierSpec {
    pub id: String,
    pub low_floor: i32,
    pub high_floor: i32,
    pub capacity: u32,
}

impl CarrierSpec {
    pub fn serves(&self, floor: i32) -> bool {
        self.low_floor <= floor && floor <= self.high_floor
    }

    /// True if both ends of the trip lie within the service range.
    pub fn covers(&self, request: &Request) -> bool {
        self.serves(request.start_floor) && self.serves(request.end_floor)
    }
}

/// Live state of a carrier as reported by the backend.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Telemetry {
    pub carrier_id: String,
    pub floor: i32,
    pub direction: Direction,
    pub occupants: u32,
    /// Remaining capacity as the backend sees it. Only used as a cross-check;
    /// the scheduler derives remaining capacity from the roster capacity.
    pub reported_remaining: u32,
}

/// Parses `id|floor|direction|occupants|remaining`.
impl FromStr for Telemetry {
    type Err = ParseError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let fields = split_fields(payload, 5)?;
        Ok(Telemetry {
            carrier_id: non_empty("carrier_id", fields[0], payload)?.to_string(),
            floor: number("floor", non_empty("floor", fields[1], payload)?)?,
            direction: non_empty("direction", fields[2], payload)?.parse()?,
            occupants: number("occupants", non_empty("occupants", fields[3], payload)?)?,
            reported_remaining: number("remaining", non_empty("remaining", fields[4], payload)?)?,
        })
    }
}

/// A roster entry: its fixed description plus the latest telemetry snapshot, if any
/// has been received yet.
#[derive(Debug, Clone)]
pub struct Carrier {
    spec: CarrierSpec,
    telemetry: Option<Telemetry>,
}

impl Carrier {
    pub fn new(spec: CarrierSpec) -> Self {
        Carrier {
            spec,
            telemetry: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn spec(&self) -> &CarrierSpec {
        &self.spec
    }

    pub fn telemetry(&self) -> Option<&Telemetry> {
        self.telemetry.as_ref()
    }

    /// Overwrites the snapshot. Telemetry addressed to another carrier is
    /// rejected and the previous snapshot is kept.
    pub fn update(&mut self, telemetry: Telemetry) -> Result<(), ParseError> {
        if telemetry.carrier_id != self.spec.id {
            return Err(ParseError::CarrierMismatch {
                expected: self.spec.id.clone(),
                found: telemetry.carrier_id,
            });
        }
        let remaining = self.spec.capacity.saturating_sub(telemetry.occupants);
        if telemetry.reported_remaining != remaining {
            warn!(
                "carrier {} reports {} free places, roster capacity {} with {} aboard gives {}",
                self.spec.id,
                telemetry.reported_remaining,
                self.spec.capacity,
                telemetry.occupants,
                remaining
            );
        }
        self.telemetry = Some(telemetry);
        Ok(())
    }

    pub fn occupants(&self) -> u32 {
        self.telemetry.as_ref().map_or(0, |t| t.occupants)
    }

    pub fn remaining_capacity(&self) -> u32 {
        self.spec.capacity.saturating_sub(self.occupants())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str, low: i32, high: i32, capacity: u32) -> CarrierSpec {
        CarrierSpec {
            id: id.to_string(),
            low_floor: low,
            high_floor: high,
            capacity,
        }
    }

    #[test]
    fn coverage_is_inclusive_at_both_ends() {
        let a = spec("A", 1, 5, 4);
        assert!(a.covers(&Request::new("1", 1, 5)));
        assert!(a.covers(&Request::new("2", 5, 1)));
        assert!(!a.covers(&Request::new("3", 3, 9)));
        assert!(!a.covers(&Request::new("4", 0, 3)));
    }

    #[test]
    fn parses_telemetry_by_name() {
        let t: Telemetry = "B2|7|D|3|5".parse().unwrap();
        assert_eq!(t.carrier_id, "B2");
        assert_eq!(t.floor, 7);
        assert_eq!(t.direction, Direction::Descending);
        assert_eq!(t.occupants, 3);
        assert_eq!(t.reported_remaining, 5);
    }

    #[test]
    fn rejects_truncated_telemetry() {
        assert!(matches!(
            "B2|7|D".parse::<Telemetry>(),
            Err(ParseError::FieldCount { expected: 5, found: 3, .. })
        ));
        assert!(matches!(
            "B2|7|Q|1|1".parse::<Telemetry>(),
            Err(ParseError::UnknownDirection(_))
        ));
    }

    #[test]
    fn remaining_capacity_follows_occupants() {
        let mut carrier = Carrier::new(spec("A", 1, 10, 4));
        assert_eq!(carrier.remaining_capacity(), 4);

        carrier.update("A|5|U|3|1".parse().unwrap()).unwrap();
        assert_eq!(carrier.remaining_capacity(), 1);

        // overfull carriers never report negative room
        carrier.update("A|5|U|6|0".parse().unwrap()).unwrap();
        assert_eq!(carrier.remaining_capacity(), 0);
    }

    #[test]
    fn keeps_snapshot_when_telemetry_is_for_another_carrier() {
        let mut carrier = Carrier::new(spec("A", 1, 10, 4));
        carrier.update("A|2|S|0|4".parse().unwrap()).unwrap();

        let err = carrier.update("B|9|D|1|3".parse().unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::CarrierMismatch { .. }));
        assert_eq!(carrier.telemetry().map(|t| t.floor), Some(2));
    }
}
