/// ----- BACKEND -----
/// Everything the pipeline needs from the transport simulation: its status,
/// the next waiting passenger, carrier telemetry and the two commands it
/// accepts. Payloads are handed back raw so each stage decides what a
/// malformed one means for it.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::Url;
use shared_resources::assignment::Assignment;
use shared_resources::config::BackendConfig;
use thiserror::Error;

const RUNNING_STATUS: &str = "Simulation is running.";
const NO_REQUEST: &str = "NONE";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} answered with HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationStatus {
    Running,
    /// Any other status text. The pipeline stops ingesting once it sees one.
    Stopped(String),
}

impl SimulationStatus {
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text == RUNNING_STATUS {
            SimulationStatus::Running
        } else {
            SimulationStatus::Stopped(text.to_string())
        }
    }
}

pub trait Backend: Send + Sync {
    /// Starts the simulation. Starting a running simulation is harmless.
    fn start_simulation(&self) -> Result<(), BackendError>;

    fn simulation_status(&self) -> Result<SimulationStatus, BackendError>;

    /// The next waiting passenger as an `id|start|end` payload, or `None`
    /// when nobody is waiting.
    fn next_request(&self) -> Result<Option<String>, BackendError>;

    /// Telemetry payload `id|floor|direction|occupants|remaining` for one carrier.
    fn carrier_status(&self, carrier_id: &str) -> Result<String, BackendError>;

    fn commit_assignment(&self, assignment: &Assignment) -> Result<(), BackendError>;
}

pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout.min(Duration::from_secs(2)))
            .build()
            .map_err(|source| BackendError::Transport {
                path: config.base_url.clone(),
                source,
            })?;
        Ok(HttpBackend { client, base_url })
    }

    /// Appends path segments to the base url, escaping ids as needed.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_text(&self, segments: &[&str]) -> Result<String, BackendError> {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| BackendError::Transport { path: path.clone(), source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                path,
                status: status.as_u16(),
            });
        }
        let body = response
            .text()
            .map_err(|source| BackendError::Transport { path: path.clone(), source })?;
        debug!("GET {} -> {:?}", path, body);
        Ok(body)
    }

    fn put(&self, segments: &[&str]) -> Result<(), BackendError> {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .map_err(|source| BackendError::Transport { path: path.clone(), source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                path,
                status: status.as_u16(),
            });
        }
        debug!("PUT {} -> {}", path, status);
        Ok(())
    }
}

impl Backend for HttpBackend {
    fn start_simulation(&self) -> Result<(), BackendError> {
        self.put(&["Simulation", "start"])
    }

    fn simulation_status(&self) -> Result<SimulationStatus, BackendError> {
        self.get_text(&["Simulation", "check"])
            .map(|text| SimulationStatus::from_text(&text))
    }

    fn next_request(&self) -> Result<Option<String>, BackendError> {
        let body = self.get_text(&["NextInput"])?;
        if body.trim() == NO_REQUEST {
            Ok(None)
        } else {
            Ok(Some(body))
        }
    }

    fn carrier_status(&self, carrier_id: &str) -> Result<String, BackendError> {
        self.get_text(&["ElevatorStatus", carrier_id])
    }

    fn commit_assignment(&self, assignment: &Assignment) -> Result<(), BackendError> {
        self.put(&[
            "AddPersonToElevator",
            &assignment.request_id,
            &assignment.carrier_id,
        ])
    }
}
