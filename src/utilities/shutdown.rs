use std::time::Duration;

use crossbeam_channel::{bounded, select, Receiver, Sender};

/// Creates a connected handle / listener pair.
pub fn channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = bounded(1);
    (
        ShutdownHandle { tx: tx.clone() },
        Shutdown {
            rx,
            _keepalive: tx,
            triggered: false,
        },
    )
}

/// Lets an operator stop ingestion. Work already accepted still drains.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Sender<()>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        // a full channel means a trigger is already pending
        let _ = self.tx.try_send(());
    }
}

#[derive(Debug)]
pub struct Shutdown {
    rx: Receiver<()>,
    // dropping every handle must not look like a trigger
    _keepalive: Sender<()>,
    triggered: bool,
}

impl Shutdown {
    pub fn is_triggered(&mut self) -> bool {
        if !self.triggered && self.rx.try_recv().is_ok() {
            self.triggered = true;
        }
        self.triggered
    }

    /// Sleeps for `timeout`, returning early with `true` if shutdown is requested.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        if self.triggered {
            return true;
        }
        select! {
            recv(self.rx) -> _ => self.triggered = true,
            default(timeout) => {},
        }
        self.triggered
    }
}
