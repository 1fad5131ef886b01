use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use log::info;

use crate::error::ConfigError;

pub const CONFIG_FILE_PATH: &str = "config.json";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub backend: BackendConfigFile,
    pub pipeline: PipelineConfigFile,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfigFile {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for BackendConfigFile {
    fn default() -> Self {
        BackendConfigFile {
            base_url: String::from("http://localhost:5432"),
            request_timeout_ms: 5000,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfigFile {
    pub poll_interval_ms: u64,
    pub status_check_interval_ms: u64,
    pub queue_capacity: usize,
    pub telemetry_attempts: u32,
}

impl Default for PipelineConfigFile {
    fn default() -> Self {
        PipelineConfigFile {
            poll_interval_ms: 500,
            status_check_interval_ms: 20_000,
            queue_capacity: 64,
            telemetry_attempts: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pause between polls while the backend has no pending request.
    pub poll_interval: Duration,
    /// How often the simulation status is re-checked while idle.
    pub status_check_interval: Duration,
    /// Depth of each handoff queue. A full queue blocks its producer.
    pub queue_capacity: usize,
    /// Telemetry fetches per candidate before it is left out of a decision.
    pub telemetry_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub backend: BackendConfig,
    pub pipeline: PipelineConfig,
}

impl From<ConfigFile> for SchedulerConfig {
    fn from(file: ConfigFile) -> Self {
        SchedulerConfig {
            backend: BackendConfig {
                base_url: file.backend.base_url.trim_end_matches('/').to_string(),
                request_timeout: Duration::from_millis(file.backend.request_timeout_ms),
            },
            pipeline: PipelineConfig {
                poll_interval: Duration::from_millis(file.pipeline.poll_interval_ms),
                status_check_interval: Duration::from_millis(
                    file.pipeline.status_check_interval_ms,
                ),
                queue_capacity: file.pipeline.queue_capacity.max(1),
                telemetry_attempts: file.pipeline.telemetry_attempts.max(1),
            },
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        ConfigFile::default().into()
    }
}

impl SchedulerConfig {
    /// Reads `config.json` from the working directory, or the defaults if
    /// there is no such file.
    pub fn get() -> Result<Self, ConfigError> {
        Self::from_path(Path::new(CONFIG_FILE_PATH))
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let config_contents = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No configuration file provided, using default settings...");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Self::from_json(&config_contents).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let config_file: ConfigFile = serde_json::from_str(contents)?;
        Ok(config_file.into())
    }
}
