/// ----- DISPATCHER MODULE -----
/// This module commits assignments to the simulation in the order the
/// scheduler made them. Each assignment is sent once; a failed commit is
/// logged and reported but not retried.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use log::{error, info};
use shared_resources::assignment::Assignment;

use crate::utilities::backend::Backend;

#[derive(serde::Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherReport {
    pub committed: usize,
    pub failed: Vec<Assignment>,
}

pub struct Dispatcher {
    backend: Arc<dyn Backend>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Dispatcher { backend }
    }

    pub fn run(self, assignments_rx: Receiver<Assignment>) -> DispatcherReport {
        info!("dispatcher started");
        let mut report = DispatcherReport::default();

        for assignment in assignments_rx.iter() {
            match self.backend.commit_assignment(&assignment) {
                Ok(()) => {
                    info!("committed {}", assignment);
                    report.committed += 1;
                }
                Err(e) => {
                    error!("committing {} failed: {}", assignment, e);
                    report.failed.push(assignment);
                }
            }
        }

        info!(
            "dispatcher finished: {} committed, {} failed",
            report.committed,
            report.failed.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;
    use crate::utilities::testing::ScriptedBackend;

    fn assignment(request_id: &str, carrier_id: &str) -> Assignment {
        Assignment {
            request_id: request_id.to_string(),
            carrier_id: carrier_id.to_string(),
        }
    }

    #[test]
    fn commits_in_queue_order_once_each() {
        let backend = Arc::new(ScriptedBackend::default().failing_commit("r2"));
        let (tx, rx) = unbounded();
        let sent = [assignment("r1", "A"), assignment("r2", "B"), assignment("r3", "A")];
        for a in sent.iter().cloned() {
            tx.send(a).unwrap();
        }
        drop(tx);

        let report = Dispatcher::new(backend.clone()).run(rx);
        assert_eq!(backend.committed(), sent);
        assert_eq!(report.committed, 2);
        assert_eq!(report.failed, [assignment("r2", "B")]);
    }

    #[test]
    fn closed_empty_queue_ends_the_dispatcher() {
        let backend = Arc::new(ScriptedBackend::default());
        let (tx, rx) = unbounded::<Assignment>();
        drop(tx);
        assert_eq!(Dispatcher::new(backend).run(rx), DispatcherReport::default());
    }
}
