/// ----- INGESTOR MODULE -----
/// This module polls the simulation for waiting passengers and feeds them to
/// the scheduler in arrival order. It stops when the simulation reports that
/// it is no longer running or when an operator requests shutdown, and closes
/// the request queue so the scheduler can finish once it has drained it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use log::{debug, error, info, trace, warn};
use shared_resources::config::PipelineConfig;
use shared_resources::request::Request;

use crate::utilities::backend::{Backend, SimulationStatus};
use crate::utilities::shutdown::Shutdown;

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    SimulationEnded(String),
    Shutdown,
    SchedulerGone,
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IngestorReport {
    pub enqueued: usize,
    pub discarded: usize,
    pub transport_failures: usize,
    pub stop_reason: StopReason,
}

pub struct Ingestor {
    backend: Arc<dyn Backend>,
    shutdown: Shutdown,
    poll_interval: Duration,
    status_check_interval: Duration,
    enqueued: usize,
    discarded: usize,
    transport_failures: usize,
}

impl Ingestor {
    pub fn new(backend: Arc<dyn Backend>, shutdown: Shutdown, config: &PipelineConfig) -> Self {
        Ingestor {
            backend,
            shutdown,
            poll_interval: config.poll_interval,
            status_check_interval: config.status_check_interval,
            enqueued: 0,
            discarded: 0,
            transport_failures: 0,
        }
    }

    pub fn run(mut self, requests_tx: Sender<Request>) -> IngestorReport {
        info!("ingestor started");
        let mut status = self.check_status(SimulationStatus::Running);
        let mut last_status_check = Instant::now();

        let stop_reason = loop {
            if let SimulationStatus::Stopped(text) = &status {
                break StopReason::SimulationEnded(text.clone());
            }
            if self.shutdown.is_triggered() {
                break StopReason::Shutdown;
            }

            match self.backend.next_request() {
                Ok(Some(payload)) => {
                    match payload.parse::<Request>() {
                        Ok(request) => {
                            debug!("received request {}", request);
                            // blocks while the scheduler is a full queue behind
                            if requests_tx.send(request).is_err() {
                                error!("scheduler has stopped, no longer accepting requests");
                                break StopReason::SchedulerGone;
                            }
                            self.enqueued += 1;
                        }
                        Err(e) => {
                            error!("discarding malformed request {:?}: {}", payload, e);
                            self.discarded += 1;
                        }
                    }
                    status = self.check_status(status);
                    last_status_check = Instant::now();
                    continue;
                }
                Ok(None) => trace!("no request waiting"),
                Err(e) => {
                    warn!("polling for the next request failed: {}", e);
                    self.transport_failures += 1;
                }
            }

            if self.shutdown.wait(self.poll_interval) {
                break StopReason::Shutdown;
            }
            if last_status_check.elapsed() >= self.status_check_interval {
                status = self.check_status(status);
                last_status_check = Instant::now();
            }
        };

        info!(
            "ingestor finished ({:?}): {} enqueued, {} discarded, {} transport failures",
            stop_reason, self.enqueued, self.discarded, self.transport_failures
        );
        IngestorReport {
            enqueued: self.enqueued,
            discarded: self.discarded,
            transport_failures: self.transport_failures,
            stop_reason,
        }
    }

    /// Asks the backend for its status, keeping `previous` if it cannot be reached.
    fn check_status(&mut self, previous: SimulationStatus) -> SimulationStatus {
        match self.backend.simulation_status() {
            Ok(status) => {
                trace!("simulation status: {:?}", status);
                status
            }
            Err(e) => {
                warn!("checking simulation status failed: {}", e);
                self.transport_failures += 1;
                previous
            }
        }
    }
}
