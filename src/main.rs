use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use log::{error, info};
use thiserror::Error;

use elevator_scheduler::utilities::backend::{BackendError, HttpBackend};
use elevator_scheduler::{Pipeline, PipelineError, RunSummary};
use shared_resources::config::SchedulerConfig;
use shared_resources::error::{ConfigError, RosterError};
use shared_resources::roster::load_roster;

/// Assigns passengers waiting in the building simulation to elevators.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Tab separated building file: carrier id, lowest floor, highest floor, capacity
    building: PathBuf,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(summary) => {
            match serde_json::to_string(&summary) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("could not serialize run summary: {}", e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            if matches!(e, StartupError::Roster(_)) {
                eprintln!("{}", Args::command().render_usage());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunSummary, StartupError> {
    // READ CONFIGURATION
    let config = SchedulerConfig::get()?;
    let roster = load_roster(&args.building)?;
    info!(
        "loaded {} carriers from {}, backend at {}",
        roster.len(),
        args.building.display(),
        config.backend.base_url
    );

    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let pipeline = Pipeline::new(backend, roster, config.pipeline);
    Ok(pipeline.run()?)
}
