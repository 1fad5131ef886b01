/// ----- SCHEDULER MODULE -----
/// This module owns the carrier roster. For every request it refreshes the
/// telemetry of the carriers able to serve it, picks one with the selection
/// rules and hands the assignment to the dispatcher. Requests nobody can
/// serve are reported, never silently dropped.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use shared_resources::assignment::{Assignment, UnserviceableReason, UnservicedRequest};
use shared_resources::carrier::{Carrier, Telemetry};
use shared_resources::config::PipelineConfig;
use shared_resources::request::Request;
use shared_resources::roster::Roster;

use crate::utilities::backend::Backend;
use crate::utilities::selection::{self, Candidate, Tier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Assigned { carrier_id: String, tier: Tier },
    Unserviceable(UnserviceableReason),
}

#[derive(serde::Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerReport {
    pub assigned: usize,
    pub unserviced: Vec<UnservicedRequest>,
    /// Assignments made after the dispatcher had already stopped.
    pub undelivered: Vec<Assignment>,
}

pub struct Scheduler {
    backend: Arc<dyn Backend>,
    roster: Roster,
    telemetry_attempts: u32,
}

impl Scheduler {
    pub fn new(backend: Arc<dyn Backend>, roster: Roster, config: &PipelineConfig) -> Self {
        Scheduler {
            backend,
            roster,
            telemetry_attempts: config.telemetry_attempts.max(1),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn run(
        mut self,
        requests_rx: Receiver<Request>,
        assignments_tx: Sender<Assignment>,
    ) -> SchedulerReport {
        info!("scheduler started with {} carriers", self.roster.len());
        let mut report = SchedulerReport::default();

        // ends once the ingestor has hung up and the queue is empty
        for request in requests_rx.iter() {
            match self.schedule(&request) {
                Outcome::Assigned { carrier_id, tier } => {
                    info!("request {} assigned to carrier {} ({})", request, carrier_id, tier);
                    let assignment = Assignment {
                        request_id: request.id,
                        carrier_id,
                    };
                    report.assigned += 1;
                    if let Err(e) = assignments_tx.send(assignment) {
                        error!("dispatcher has stopped, assignment {} cannot be committed", e.0);
                        report.undelivered.push(e.0);
                    }
                }
                Outcome::Unserviceable(reason) => {
                    error!("request {} cannot be serviced: {}", request, reason);
                    report.unserviced.push(UnservicedRequest {
                        request_id: request.id,
                        start_floor: request.start_floor,
                        end_floor: request.end_floor,
                        reason,
                    });
                }
            }
        }

        info!(
            "scheduler finished: {} assigned, {} unserviced",
            report.assigned,
            report.unserviced.len()
        );
        report
    }

    /// Makes one scheduling decision, refreshing telemetry of every carrier
    /// whose range covers the request.
    pub fn schedule(&mut self, request: &Request) -> Outcome {
        let backend = self.backend.as_ref();
        let attempts = self.telemetry_attempts;

        let mut in_range = 0;
        let mut fresh = Vec::with_capacity(self.roster.len());
        for carrier in self.roster.iter_mut() {
            let eligible = carrier.spec().covers(request);
            if eligible {
                in_range += 1;
            }
            fresh.push(eligible && refresh(backend, carrier, attempts));
        }

        if in_range == 0 {
            return Outcome::Unserviceable(UnserviceableReason::NoCarrierInRange);
        }

        let candidates: Vec<Candidate> = self
            .roster
            .iter()
            .zip(fresh)
            .filter(|(_, fresh)| *fresh)
            .filter_map(|(carrier, _)| candidate(carrier))
            .collect();
        debug!(
            "request {}: {} of {} carriers in range, {} with fresh telemetry",
            request.id,
            in_range,
            self.roster.len(),
            candidates.len()
        );

        match selection::select(request, &candidates) {
            Some(chosen) => Outcome::Assigned {
                carrier_id: chosen.candidate.carrier_id.to_string(),
                tier: chosen.key.tier,
            },
            None => Outcome::Unserviceable(UnserviceableReason::TelemetryUnavailable),
        }
    }
}

fn candidate(carrier: &Carrier) -> Option<Candidate<'_>> {
    let telemetry = carrier.telemetry()?;
    Some(Candidate {
        carrier_id: carrier.id(),
        floor: telemetry.floor,
        direction: telemetry.direction,
        occupants: telemetry.occupants,
        remaining_capacity: carrier.remaining_capacity(),
    })
}

/// Fetches fresh telemetry, trying up to `attempts` times. A carrier that
/// never answers usefully keeps its old snapshot and sits this decision out.
fn refresh(backend: &dyn Backend, carrier: &mut Carrier, attempts: u32) -> bool {
    for attempt in 1..=attempts {
        let result = backend.carrier_status(carrier.id());
        match result {
            Ok(payload) => match payload.parse::<Telemetry>().and_then(|t| carrier.update(t)) {
                Ok(()) => return true,
                Err(e) => warn!(
                    "carrier {}: discarding telemetry {:?}: {} (attempt {}/{})",
                    carrier.id(),
                    payload,
                    e,
                    attempt,
                    attempts
                ),
            },
            Err(e) => warn!(
                "carrier {}: telemetry unavailable: {} (attempt {}/{})",
                carrier.id(),
                e,
                attempt,
                attempts
            ),
        }
    }
    false
}
