//! skuline - product-detail scraper for retail catalog APIs
//!
//! Reads a chunk of product links, fetches each product's variants through
//! the retailer's JSON APIs, and appends one row per color variant to a
//! resumable CSV ledger.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

mod config;

use config::FileConfig;
use skuline_dsg::runner::RunStatus;

#[derive(Parser)]
#[command(name = "skuline")]
#[command(about = "Product-detail scraper with a resumable CSV ledger")]
#[command(version)]
struct Cli {
    /// Input CSV chunk with a pd_links column (deleted when fully consumed)
    #[arg(short = 'I', long)]
    input: PathBuf,

    /// Ledger CSV to append to (default from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Session cookie file
    #[arg(long)]
    cookies: Option<PathBuf>,

    /// Maximum concurrent fetches
    #[arg(long)]
    concurrency: Option<usize>,

    /// Maximum fetches simultaneously inside their timeout window
    #[arg(long)]
    timeout_budget: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    request_timeout: Option<u64>,

    /// Config file path (default: ./skuline.toml or ~/.config/skuline/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "debug")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    skuline_core::init_logging(cli.quiet, cli.debug);

    match execute(cli).await {
        Ok(status) => status.exit_code(),
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

async fn execute(cli: Cli) -> Result<RunStatus> {
    let file_config = if let Some(path) = &cli.config {
        FileConfig::from_file(path)?
    } else {
        FileConfig::load()?
    };

    // Config file fills defaults; CLI flags override the file
    let mut config = skuline_dsg::Config::new(cli.input);
    config.output_file = cli.output.unwrap_or(file_config.files.output);
    config.cookie_file = cli.cookies.unwrap_or(file_config.files.cookies);
    config.concurrency = cli.concurrency.unwrap_or(file_config.fetch.concurrency);
    config.timeout_budget = cli
        .timeout_budget
        .unwrap_or(file_config.fetch.timeout_budget);
    config.request_timeout = Duration::from_secs(
        cli.request_timeout
            .unwrap_or(file_config.fetch.request_timeout_secs),
    );
    config.endpoints = file_config.endpoints.resolve();
    config.validate()?;

    skuline_dsg::runner::run(&config).await
}
