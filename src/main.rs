use std::process::ExitCode;

use studio_manager::storage::config::Config;
use tracing_subscriber::EnvFilter;

mod cli;
mod sample_appointments;
use cli::{parse_cli_command, run_command, USAGE};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let invocation = match parse_cli_command(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run_command(invocation).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            tracing::error!("Command failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() {
    let log_dir = Config::app_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "studio-manager.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("studio-manager started");
}
