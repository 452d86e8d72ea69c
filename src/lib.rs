mod cli;
mod render;

pub mod config;
pub mod error;
pub mod tabular;
pub mod telemetry;
pub mod workflows;

use error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
