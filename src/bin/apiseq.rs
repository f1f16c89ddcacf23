use apiseq::cli::run_cli;
use apiseq::logging::{init_logging, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Held until exit so buffered log lines are flushed.
    let _guard = match init_logging(&LogConfig::from_env()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: {err:#}");
            None
        }
    };

    match run_cli() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
