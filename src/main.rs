//! MediaProbe
//!
//! Typed queries over MediaInfo's JSON report.
//!
//! # Usage
//!
//! ```bash
//! mediaprobe fps -i clip.mov
//! mediaprobe locate -i clip.mov 7 --ffmpeg
//! mediaprobe search -i clip.mov Format_Profile video
//! mediaprobe summary -i a.mov -i b.mov --json
//! ```

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use mediaprobe::adapters::init_logging;
use mediaprobe::cli::{self, Cli};
use mediaprobe::error::ProbeError;

/// Exit status for failures that carry no probe error
const GENERIC_FAILURE: i32 = 1;

/// Main entry point for the MediaProbe CLI application
fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level, cli.log_format) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }

    info!("Starting MediaProbe");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            std::process::exit(GENERIC_FAILURE);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let result = runtime.block_on(cli::run(cli, &mut stdout));
    let flushed = stdout.flush().context("Failed to write output");
    let result = result.and(flushed);

    if let Err(err) = result {
        let code = exit_code(&err);
        error!(exit_code = code, "{:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(code);
    }

    info!("MediaProbe completed successfully");
}

/// Map an error to the exit status of the first probe error in its chain
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ProbeError>())
        .map(ProbeError::exit_code)
        .unwrap_or(GENERIC_FAILURE)
}
