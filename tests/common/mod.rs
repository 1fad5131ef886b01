#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use elevator_scheduler::utilities::backend::{Backend, BackendError, SimulationStatus};
use shared_resources::assignment::Assignment;
use shared_resources::config::PipelineConfig;
use shared_resources::roster::{load_roster_reader, Roster};

pub enum Arrival {
    Passenger(String),
    Quiet,
}

pub fn passenger(id: &str, start: i32, end: i32) -> Arrival {
    Arrival::Passenger(format!("{}|{}|{}", id, start, end))
}

/// In-memory building: hands out scripted arrivals, answers telemetry from a
/// fixed table and records every commit.
pub struct SimulatedBuilding {
    arrivals: Mutex<VecDeque<Arrival>>,
    telemetry: HashMap<String, String>,
    failing_commits: HashSet<String>,
    endless: bool,
    jitter: Duration,
    commits: Mutex<Vec<Assignment>>,
    pub starts: AtomicUsize,
}

impl SimulatedBuilding {
    pub fn new(arrivals: Vec<Arrival>) -> Self {
        SimulatedBuilding {
            arrivals: Mutex::new(arrivals.into()),
            telemetry: HashMap::new(),
            failing_commits: HashSet::new(),
            endless: false,
            jitter: Duration::ZERO,
            commits: Mutex::new(Vec::new()),
            starts: AtomicUsize::new(0),
        }
    }

    pub fn carrier(
        mut self,
        id: &str,
        floor: i32,
        direction: &str,
        occupants: u32,
        remaining: u32,
    ) -> Self {
        self.telemetry.insert(
            id.to_string(),
            format!("{}|{}|{}|{}|{}", id, floor, direction, occupants, remaining),
        );
        self
    }

    /// Keeps reporting "running" after the last arrival.
    pub fn endless(mut self) -> Self {
        self.endless = true;
        self
    }

    /// Sleeps up to `jitter` inside every call to shake up thread interleavings.
    pub fn jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn failing_commit(mut self, request_id: &str) -> Self {
        self.failing_commits.insert(request_id.to_string());
        self
    }

    pub fn arrivals_left(&self) -> usize {
        self.arrivals.lock().unwrap().len()
    }

    pub fn committed(&self) -> Vec<Assignment> {
        self.commits.lock().unwrap().clone()
    }

    fn pause(&self, salt: usize) {
        if !self.jitter.is_zero() {
            let nanos = self.jitter.as_nanos() as usize;
            let spread = (salt.wrapping_mul(2_654_435_761)) % nanos.max(1);
            thread::sleep(Duration::from_nanos(spread as u64));
        }
    }
}

fn unavailable(path: &str) -> BackendError {
    BackendError::Status {
        path: path.to_string(),
        status: 503,
    }
}

impl Backend for SimulatedBuilding {
    fn start_simulation(&self) -> Result<(), BackendError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn simulation_status(&self) -> Result<SimulationStatus, BackendError> {
        if self.endless || self.arrivals_left() > 0 {
            Ok(SimulationStatus::Running)
        } else {
            Ok(SimulationStatus::Stopped("Simulation is complete.".to_string()))
        }
    }

    fn next_request(&self) -> Result<Option<String>, BackendError> {
        let next = self.arrivals.lock().unwrap().pop_front();
        self.pause(self.arrivals_left());
        match next {
            Some(Arrival::Passenger(payload)) => Ok(Some(payload)),
            Some(Arrival::Quiet) | None => Ok(None),
        }
    }

    fn carrier_status(&self, carrier_id: &str) -> Result<String, BackendError> {
        self.pause(carrier_id.len());
        self.telemetry
            .get(carrier_id)
            .cloned()
            .ok_or_else(|| unavailable(carrier_id))
    }

    fn commit_assignment(&self, assignment: &Assignment) -> Result<(), BackendError> {
        self.pause(assignment.request_id.len());
        self.commits.lock().unwrap().push(assignment.clone());
        if self.failing_commits.contains(&assignment.request_id) {
            return Err(unavailable("/AddPersonToElevator"));
        }
        Ok(())
    }
}

pub fn roster(tsv: &str) -> Roster {
    load_roster_reader(Cursor::new(tsv.to_string())).unwrap()
}

pub fn fast_config(queue_capacity: usize) -> PipelineConfig {
    PipelineConfig {
        poll_interval: Duration::from_millis(1),
        status_check_interval: Duration::from_millis(5),
        queue_capacity,
        telemetry_attempts: 2,
    }
}
