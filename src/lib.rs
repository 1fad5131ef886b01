//! Assigns passengers waiting in a simulated building to elevators.
//!
//! Three threads share the work: the ingestor polls the simulation for
//! waiting passengers, the scheduler picks a carrier for each of them, and
//! the dispatcher commits the picks back to the simulation.

pub mod modules;
pub mod utilities;

pub use modules::{Pipeline, PipelineError, RunSummary};
