use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ensayo::config::RigConfig;
use ensayo::drivers::{convert_file, RigError};

/// Convert raw ADC codes in a capture to volts.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Capture file, e.g. `datos_0912.csv`.
    file: Option<PathBuf>,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<PathBuf, RigError> {
    let config = RigConfig::load_or_default(args.config.as_deref())?;
    let file = args.file.ok_or(RigError::NoInput)?;
    convert_file(&file, &config.adc)
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(output) => {
            println!("[INFO] processed file saved to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("conversion failed: {err:?}");
            eprintln!("[ERROR] {err}");
            ExitCode::FAILURE
        }
    }
}
