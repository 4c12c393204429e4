//! Run orchestration: resume filtering, task fan-out, fatal rollback, and
//! the final summary.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use skuline_core::{
    build_client, resume_urls, rollback_last_url, Abort, AbortReason, FetchBudget, LedgerWriter,
    TransportError,
};
use tokio::task::JoinSet;

use crate::config::Config;
use crate::record;
use crate::session;
use crate::stats::RunSummary;
use crate::task::{process_link, TaskContext, TaskOutcome};

/// Input CSV column holding product-detail links.
const INPUT_COLUMN: &str = "pd_links";

/// How a run ended. Maps one-to-one onto the process exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// All scheduled work finished; the input chunk was consumed
    Completed,
    /// A transport failure aborted the run after rollback
    FatalTransport,
    /// An interrupt drained the run without rollback
    Interrupted,
}

impl RunStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Completed => ExitCode::SUCCESS,
            Self::FatalTransport => ExitCode::from(1),
            Self::Interrupted => ExitCode::from(130),
        }
    }
}

/// Execute one scrape run over the input chunk.
pub async fn run(config: &Config) -> anyhow::Result<RunStatus> {
    let started = Instant::now();

    let cookie = session::load_cookie(&config.cookie_file)?;
    let headers = session::build_headers(&cookie)?;
    let client =
        build_client(headers, config.request_timeout).context("cannot build HTTP client")?;

    let links = read_links(&config.input_file)?;
    log::info!(
        "{} link(s) in {}, concurrency {}, timeout budget {}",
        links.len(),
        config.input_file.display(),
        config.concurrency,
        config.timeout_budget
    );

    let done = resume_urls(&config.output_file, record::URL_COLUMN)?;
    if !done.is_empty() {
        log::info!("{} URL(s) already in the ledger", done.len());
    }

    let mut summary = RunSummary {
        input_links: links.len(),
        ..Default::default()
    };

    let mut pending = Vec::with_capacity(links.len());
    for link in links {
        if done.contains(&link) {
            log::info!("skipping {link}: already processed");
            summary.skipped_resume += 1;
        } else {
            pending.push(link);
        }
    }

    let (ledger, writer) = LedgerWriter::channel(&config.output_file, record::LEDGER_HEADERS);
    let writer_task = tokio::spawn(writer.run());

    let abort = Abort::new();
    spawn_interrupt_watcher(abort.clone());

    let ctx = Arc::new(TaskContext {
        client,
        budget: FetchBudget::new(config.concurrency, config.timeout_budget),
        endpoints: config.endpoints.clone(),
        ledger,
        abort: abort.clone(),
    });

    let mut tasks = JoinSet::new();
    for link in pending {
        tasks.spawn(process_link(ctx.clone(), link));
    }

    let mut fatal: Option<TransportError> = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("task panicked: {e}");
                summary.malformed += 1;
                continue;
            }
        };
        match outcome {
            TaskOutcome::Saved { rows } => {
                summary.saved_products += 1;
                summary.rows += rows;
            }
            TaskOutcome::NoData => summary.no_data += 1,
            TaskOutcome::Malformed { reason } => {
                log::warn!("skipped malformed product: {reason}");
                summary.malformed += 1;
            }
            TaskOutcome::Aborted => summary.aborted += 1,
            TaskOutcome::Fatal(e) => {
                log::error!("{e}; aborting run");
                if fatal.is_none() {
                    fatal = Some(e);
                }
                abort.trigger(AbortReason::FatalTransport);
            }
        }
    }

    // Last sender lives inside the shared context; dropping it lets the
    // writer drain and exit.
    drop(ctx);
    match writer_task.await {
        Ok(Ok(rows)) => log::info!("ledger: {rows} row(s) appended"),
        Ok(Err(e)) => log::error!("ledger writer failed: {e:#}"),
        Err(e) => log::error!("ledger writer panicked: {e}"),
    }

    summary.elapsed = started.elapsed();

    if fatal.is_some() {
        rollback_last_url(&config.output_file, record::URL_COLUMN)?;
        summary.report();
        return Ok(RunStatus::FatalTransport);
    }
    if abort.reason() == Some(AbortReason::Interrupted) {
        summary.report();
        return Ok(RunStatus::Interrupted);
    }

    std::fs::remove_file(&config.input_file).with_context(|| {
        format!(
            "cannot delete consumed input {}",
            config.input_file.display()
        )
    })?;
    log::info!("input {} consumed", config.input_file.display());
    summary.report();
    Ok(RunStatus::Completed)
}

/// SIGINT drains the run without rollback; the exit code is 130.
fn spawn_interrupt_watcher(abort: Abort) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, stopping");
            abort.trigger(AbortReason::Interrupted);
        }
    });
}

/// Read the input chunk's link column.
///
/// Chunks come from spreadsheet exports that are not always UTF-8, so rows
/// are decoded lossily instead of rejected.
fn read_links(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("cannot read input {}", path.display()))?;
    let idx = reader
        .byte_headers()
        .context("cannot read input header")?
        .iter()
        .position(|h| h == INPUT_COLUMN.as_bytes())
        .with_context(|| format!("input CSV has no '{INPUT_COLUMN}' column"))?;

    let mut links = Vec::new();
    for record in reader.byte_records() {
        let record = record.context("malformed input row")?;
        if let Some(raw) = record.get(idx) {
            let link = String::from_utf8_lossy(raw).trim().to_string();
            if !link.is_empty() {
                links.push(link);
            }
        }
    }
    Ok(links)
}
