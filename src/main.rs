//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `http_request_aggregator` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Writing the aggregate to stdout
//!
//! All core functionality is implemented in the library crate.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::warn;

use http_request_aggregator::app::read_uris;
use http_request_aggregator::config::DEFAULT_USER_AGENT;
use http_request_aggregator::initialization::init_logger_with;
use http_request_aggregator::report;
use http_request_aggregator::{
    Config, Credentials, HttpMethod, HttpRequestAggregator, LogFormat, LogLevel, ReturnData,
};

/// What to print on stdout once the batch completes.
#[derive(Clone, Debug, ValueEnum)]
enum OutputMode {
    /// Only the per-status summary
    Summary,
    /// The aggregated JSON array
    Json,
    /// One JSON document per line
    Fragments,
}

/// Fetch a batch of URIs concurrently and aggregate the JSON bodies of the 200 responses.
#[derive(Debug, Parser)]
#[command(name = "http_request_aggregator", version, about)]
struct Cli {
    /// File with one URI per line (`-` reads stdin)
    file: PathBuf,

    /// Basic-auth user name
    #[arg(long)]
    username: Option<String>,

    /// Basic-auth password
    #[arg(long, env = "HRA_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// HTTP method (only GET can be dispatched)
    #[arg(long, value_enum, default_value_t = HttpMethod::Get)]
    method: HttpMethod,

    /// TCP connect timeout in seconds
    #[arg(long, default_value_t = 10)]
    connect_timeout_secs: u64,

    /// Total per-request timeout in seconds
    #[arg(long, default_value_t = 200)]
    request_timeout_secs: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Output written to stdout
    #[arg(long, value_enum, default_value_t = OutputMode::Json)]
    output: OutputMode,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,
}

impl Cli {
    fn into_config(self, uris: Vec<String>) -> Config {
        Config {
            uris,
            credentials: self
                .username
                .map(|username| Credentials::new(username, self.password)),
            method: self.method,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent,
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.password.is_some() && cli.username.is_none() {
        warn!("Password given without --username; requests are sent without credentials");
    }
    let output = cli.output.clone();
    let uris = read_uris(&cli.file)?;
    let config = cli.into_config(uris);

    let mut aggregator =
        HttpRequestAggregator::new(config).context("Failed to initialize aggregator")?;
    aggregator.run_batch().context("Failed to run batch")?;
    if let Some(run) = aggregator.run() {
        report::log_report(run.store());
    }

    match output {
        OutputMode::Summary => print!("{}", aggregator.summary()),
        OutputMode::Json => println!(
            "{}",
            aggregator
                .aggregated_json()
                .context("Failed to aggregate responses")?
        ),
        OutputMode::Fragments => {
            if let ReturnData::Fragments(fragments) = aggregator
                .return_data(false)
                .context("Failed to aggregate responses")?
            {
                for fragment in fragments {
                    println!("{fragment}");
                }
            }
        }
    }
    Ok(())
}

fn main() {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = cli.log_level.clone();
    let log_format = cli.log_format.clone();
    if let Err(e) = init_logger_with(log_level.into(), log_format) {
        eprintln!("http_request_aggregator error: {e}");
        process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("http_request_aggregator error: {:#}", e);
        process::exit(1);
    }
}
