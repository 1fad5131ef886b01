//! Carrier roster and its loader.
//!
//! The roster file is tab separated, one carrier per line, no header:
//!
//! ```text
//! A	1	10	8
//! B	1	20	12
//! ```
//!
//! Columns are id, lowest floor served, highest floor served and capacity.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::carrier::{Carrier, CarrierSpec};
use crate::error::RosterError;

#[derive(Deserialize)]
struct RosterRecord {
    id: String,
    low_floor: i32,
    high_floor: i32,
    capacity: u32,
}

/// The fixed set of carriers, in file order. Only telemetry changes after load.
#[derive(Debug, Clone)]
pub struct Roster {
    carriers: Vec<Carrier>,
}

impl Roster {
    pub fn new(specs: Vec<CarrierSpec>) -> Self {
        Roster {
            carriers: specs.into_iter().map(Carrier::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Carrier> {
        self.carriers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Carrier> {
        self.carriers.iter_mut()
    }

    pub fn get(&self, id: &str) -> Option<&Carrier> {
        self.carriers.iter().find(|carrier| carrier.id() == id)
    }
}

pub fn load_roster(path: &Path) -> Result<Roster, RosterError> {
    let file = File::open(path).map_err(|source| RosterError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_roster_reader(file)
}

/// Like [`load_roster`] but reads from any source.
pub fn load_roster_reader<R: Read>(reader: R) -> Result<Roster, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut specs = Vec::new();
    let mut seen = HashSet::new();

    for result in csv_reader.records() {
        let record = result.map_err(|source| RosterError::Csv {
            line: source.position().map_or(0, |p| p.line()),
            source,
        })?;
        let line = record.position().map_or(0, |p| p.line());
        let row: RosterRecord = record
            .deserialize(None)
            .map_err(|source| RosterError::Csv { line, source })?;

        if row.id.is_empty() {
            return Err(RosterError::EmptyId { line });
        }
        if row.low_floor > row.high_floor {
            return Err(RosterError::InvertedRange {
                line,
                id: row.id,
                low: row.low_floor,
                high: row.high_floor,
            });
        }
        if !seen.insert(row.id.clone()) {
            return Err(RosterError::DuplicateId { line, id: row.id });
        }

        debug!(
            "roster: carrier {} serves {}..={} with capacity {}",
            row.id, row.low_floor, row.high_floor, row.capacity
        );
        specs.push(CarrierSpec {
            id: row.id,
            low_floor: row.low_floor,
            high_floor: row.high_floor,
            capacity: row.capacity,
        });
    }

    if specs.is_empty() {
        return Err(RosterError::Empty);
    }
    Ok(Roster::new(specs))
}
