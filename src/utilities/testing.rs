//! Scripted stand-in for the simulation backend, for stage tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use shared_resources::assignment::Assignment;

use super::backend::{Backend, BackendError, SimulationStatus};

pub(crate) enum Poll {
    Payload(&'static str),
    Nothing,
    Failure,
}

fn unavailable(path: &str) -> BackendError {
    BackendError::Status {
        path: path.to_string(),
        status: 503,
    }
}

/// Reports "running" until every scripted poll has been handed out.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    polls: Mutex<VecDeque<Poll>>,
    telemetry: Mutex<HashMap<String, VecDeque<Option<String>>>>,
    failing_commits: Mutex<HashSet<String>>,
    pub commits: Mutex<Vec<Assignment>>,
    pub status_checks: AtomicUsize,
    pub starts: AtomicUsize,
    pub telemetry_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn with_polls(polls: Vec<Poll>) -> Self {
        ScriptedBackend {
            polls: Mutex::new(polls.into()),
            ..Default::default()
        }
    }

    /// Queues telemetry answers for a carrier; `None` is a failed call.
    /// The last answer repeats once the queue is down to one.
    pub fn telemetry(self, carrier_id: &str, answers: &[Option<&str>]) -> Self {
        self.telemetry.lock().unwrap().insert(
            carrier_id.to_string(),
            answers.iter().map(|a| a.map(str::to_string)).collect(),
        );
        self
    }

    pub fn failing_commit(self, request_id: &str) -> Self {
        self.failing_commits.lock().unwrap().insert(request_id.to_string());
        self
    }

    pub fn polls_left(&self) -> usize {
        self.polls.lock().unwrap().len()
    }

    pub fn committed(&self) -> Vec<Assignment> {
        self.commits.lock().unwrap().clone()
    }
}

impl Backend for ScriptedBackend {
    fn start_simulation(&self) -> Result<(), BackendError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn simulation_status(&self) -> Result<SimulationStatus, BackendError> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        if self.polls.lock().unwrap().is_empty() {
            Ok(SimulationStatus::Stopped("Simulation is complete.".to_string()))
        } else {
            Ok(SimulationStatus::Running)
        }
    }

    fn next_request(&self) -> Result<Option<String>, BackendError> {
        match self.polls.lock().unwrap().pop_front() {
            Some(Poll::Payload(payload)) => Ok(Some(payload.to_string())),
            Some(Poll::Nothing) | None => Ok(None),
            Some(Poll::Failure) => Err(unavailable("/NextInput")),
        }
    }

    fn carrier_status(&self, carrier_id: &str) -> Result<String, BackendError> {
        self.telemetry_calls.fetch_add(1, Ordering::SeqCst);
        let mut telemetry = self.telemetry.lock().unwrap();
        let answers = telemetry
            .get_mut(carrier_id)
            .ok_or_else(|| unavailable(carrier_id))?;
        let answer = if answers.len() > 1 {
            answers.pop_front().flatten()
        } else {
            answers.front().cloned().flatten()
        };
        answer.ok_or_else(|| unavailable(carrier_id))
    }

    fn commit_assignment(&self, assignment: &Assignment) -> Result<(), BackendError> {
        self.commits.lock().unwrap().push(assignment.clone());
        if self.failing_commits.lock().unwrap().contains(&assignment.request_id) {
            return Err(unavailable("/AddPersonToElevator"));
        }
        Ok(())
    }
}
