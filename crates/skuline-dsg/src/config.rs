//! Runtime configuration for a scrape run

use std::path::PathBuf;
use std::time::Duration;

use crate::api::Endpoints;

pub const DEFAULT_CONCURRENCY: usize = 100;
pub const DEFAULT_TIMEOUT_BUDGET: usize = 100;
pub const DEFAULT_OUTPUT_FILE: &str = "dickssportgoods-chunked.csv";
pub const DEFAULT_COOKIE_FILE: &str = "cookies.txt";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Input CSV chunk with the `pd_links` column; deleted once consumed
    pub input_file: PathBuf,
    /// The ledger CSV, created on first write
    pub output_file: PathBuf,
    /// Session cookie credential file
    pub cookie_file: PathBuf,
    /// Cap on concurrent fetches
    pub concurrency: usize,
    /// Cap on fetches simultaneously inside their timeout window
    pub timeout_budget: usize,
    /// Whole-round-trip timeout per request
    pub request_timeout: Duration,
    pub endpoints: Endpoints,
}

impl Config {
    /// Production defaults; only the input chunk is caller-supplied.
    pub fn new(input_file: PathBuf) -> Self {
        Self {
            input_file,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            cookie_file: PathBuf::from(DEFAULT_COOKIE_FILE),
            concurrency: DEFAULT_CONCURRENCY,
            timeout_budget: DEFAULT_TIMEOUT_BUDGET,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            endpoints: Endpoints::default(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.concurrency > 0, "concurrency must be positive");
        anyhow::ensure!(self.timeout_budget > 0, "timeout budget must be positive");
        anyhow::ensure!(
            !self.request_timeout.is_zero(),
            "request timeout must be positive"
        );
        anyhow::ensure!(
            self.input_file.exists(),
            "input file {} does not exist",
            self.input_file.display()
        );
        Ok(())
    }
}
