use std::io;

use thiserror::Error;

/// Failure to read a backend payload into one of the shared types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected} fields separated by '|', got {found} in {payload:?}")]
    FieldCount {
        payload: String,
        expected: usize,
        found: usize,
    },

    #[error("field `{field}` is empty in {payload:?}")]
    EmptyField { field: &'static str, payload: String },

    #[error("field `{field}` is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("unknown direction code {0:?}")]
    UnknownDirection(String),

    #[error("telemetry for carrier {found} returned when asking for {expected}")]
    CarrierMismatch { expected: String, found: String },
}

/// Failure to load the carrier roster. Always fatal at startup.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("could not read roster {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: carrier {id} has low floor {low} above high floor {high}")]
    InvertedRange { line: u64, id: String, low: i32, high: i32 },

    #[error("line {line}: carrier id {id} appears more than once")]
    DuplicateId { line: u64, id: String },

    #[error("line {line}: carrier id is empty")]
    EmptyId { line: u64 },

    #[error("roster contains no carriers")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
