use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::domain::error::AppError;
use crate::interfaces::cli::{self, Args};

pub fn run() -> ExitCode {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();
    match cli::execute(&args) {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(err @ AppError::UnmappedPlaceholders(_)) => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
