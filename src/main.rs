//! Command-line entry point: parses flags, sets up logging and runs the
//! scoring pipeline against stdin/stdout.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use place_similarity::config::{
    DEFAULT_CACHE_PATH, DEFAULT_CITY_COLUMN, DEFAULT_INPUT_PATH, DEFAULT_STATE_COLUMN,
};
use place_similarity::{run, InputColumns, OutputFormat, RunConfig, Threshold};

#[derive(Parser, Debug)]
#[command(name = "place-similarity", version, about = "Find U.S. cities named after their state")]
struct Cli {
    /// CSV file with state and city columns.
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Score cache; created on first run and appended to afterwards.
    #[arg(long, default_value = DEFAULT_CACHE_PATH)]
    cache: PathBuf,

    #[arg(long, default_value = DEFAULT_STATE_COLUMN)]
    state_column: String,

    #[arg(long, default_value = DEFAULT_CITY_COLUMN)]
    city_column: String,

    /// Minimum threshold (0.0-1.0). Prompts interactively when omitted.
    #[arg(long, value_parser = parse_threshold)]
    min_threshold: Option<Threshold>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Do not draw the row progress bar.
    #[arg(long)]
    no_progress: bool,
}

fn parse_threshold(s: &str) -> Result<Threshold, String> {
    let value: f64 = s.trim().parse().map_err(|_| format!("'{}' is not a number", s))?;
    Threshold::from_value(value).map_err(|e| e.to_string())
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        RunConfig {
            input_path: cli.input,
            cache_path: cli.cache,
            columns: InputColumns {
                state: cli.state_column,
                city: cli.city_column,
            },
            min_threshold: cli.min_threshold,
            format: cli.format,
            progress: !cli.no_progress,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = RunConfig::from(Cli::parse());
    let stdin = io::stdin();
    let stdout = io::stdout();

    match run(&config, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
