//! Types shared by the scheduler binary and its tests: requests, carriers and
//! their telemetry, assignments, configuration and the roster loader.

pub mod assignment;
pub mod carrier;
pub mod config;
pub mod direction;
pub mod error;
pub mod request;
pub mod roster;

mod payload;
