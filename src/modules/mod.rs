use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::bounded;
use log::{info, warn};
use shared_resources::assignment::Assignment;
use shared_resources::config::PipelineConfig;
use shared_resources::request::Request;
use shared_resources::roster::Roster;
use thiserror::Error;

use crate::utilities::backend::Backend;
use crate::utilities::shutdown::{self, Shutdown, ShutdownHandle};

pub mod dispatcher;
pub mod ingestor;
pub mod scheduler;

use dispatcher::{Dispatcher, DispatcherReport};
use ingestor::{Ingestor, IngestorReport};
use scheduler::{Scheduler, SchedulerReport};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not start the {stage} thread: {source}")]
    Spawn {
        stage: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("the {0} thread panicked")]
    StagePanicked(&'static str),
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ingestor: IngestorReport,
    pub scheduler: SchedulerReport,
    pub dispatcher: DispatcherReport,
}

/// Ingestor, scheduler and dispatcher wired together by two bounded queues.
pub struct Pipeline {
    backend: Arc<dyn Backend>,
    roster: Roster,
    config: PipelineConfig,
    shutdown_handle: ShutdownHandle,
    shutdown: Shutdown,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn Backend>, roster: Roster, config: PipelineConfig) -> Self {
        let (shutdown_handle, shutdown) = shutdown::channel();
        Pipeline {
            backend,
            roster,
            config,
            shutdown_handle,
            shutdown,
        }
    }

    /// Stops ingestion when triggered. Requests already accepted are still
    /// scheduled and committed before [`Pipeline::run`] returns.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown_handle.clone()
    }

    /// Starts the simulation, runs all three stages to completion and
    /// returns what each of them did.
    pub fn run(self) -> Result<RunSummary, PipelineError> {
        if let Err(e) = self.backend.start_simulation() {
            warn!("starting the simulation failed, continuing anyway: {}", e);
        }

        let capacity = self.config.queue_capacity.max(1);
        let (requests_tx, requests_rx) = bounded::<Request>(capacity);
        let (assignments_tx, assignments_rx) = bounded::<Assignment>(capacity);

        let ingestor = Ingestor::new(self.backend.clone(), self.shutdown, &self.config);
        let scheduler = Scheduler::new(self.backend.clone(), self.roster, &self.config);
        let dispatcher = Dispatcher::new(self.backend);

        // INITIALIZE THREADS, DOWNSTREAM FIRST
        let dispatcher_handle = spawn("dispatcher", move || dispatcher.run(assignments_rx))?;
        let scheduler_handle =
            spawn("scheduler", move || scheduler.run(requests_rx, assignments_tx))?;
        let ingestor_handle = spawn("ingestor", move || ingestor.run(requests_tx))?;

        let summary = RunSummary {
            ingestor: join("ingestor", ingestor_handle)?,
            scheduler: join("scheduler", scheduler_handle)?,
            dispatcher: join("dispatcher", dispatcher_handle)?,
        };
        info!(
            "pipeline finished: {} in, {} assigned, {} unserviced, {} committed, {} failed",
            summary.ingestor.enqueued,
            summary.scheduler.assigned,
            summary.scheduler.unserviced.len(),
            summary.dispatcher.committed,
            summary.dispatcher.failed.len()
        );
        Ok(summary)
    }
}

fn spawn<T, F>(stage: &'static str, f: F) -> Result<JoinHandle<T>, PipelineError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(stage.to_string())
        .spawn(f)
        .map_err(|source| PipelineError::Spawn { stage, source })
}

fn join<T>(stage: &'static str, handle: JoinHandle<T>) -> Result<T, PipelineError> {
    handle.join().map_err(|_| PipelineError::StagePanicked(stage))
}
