//! CSV ledger — the durable output file doubling as the resume checkpoint.
//!
//! All appends flow through a single writer task fed over a bounded channel,
//! one batch per product, so concurrent pipeline tasks never touch the file
//! directly. Rollback and resume read the URL column that keys the ledger.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::sync::mpsc;

/// One product's output rows, appended atomically as a unit.
pub type RowBatch = Vec<Vec<String>>;

/// Bounded capacity of the writer channel.
const CHANNEL_CAPACITY: usize = 32;

/// Sending half handed to pipeline tasks.
#[derive(Clone)]
pub struct LedgerHandle {
    tx: mpsc::Sender<RowBatch>,
}

impl LedgerHandle {
    /// Queue one product's rows for the writer.
    ///
    /// Fails only when the writer task is gone, which a pipeline task treats
    /// as a run-level failure.
    pub async fn write(&self, rows: RowBatch) -> anyhow::Result<()> {
        self.tx
            .send(rows)
            .await
            .map_err(|_| anyhow::anyhow!("ledger writer closed"))
    }
}

/// Receiving half: the single writer task.
pub struct LedgerWriter {
    path: PathBuf,
    headers: &'static [&'static str],
    rx: mpsc::Receiver<RowBatch>,
}

impl LedgerWriter {
    /// Create the writer and its sending handle.
    pub fn channel(path: &Path, headers: &'static [&'static str]) -> (LedgerHandle, LedgerWriter) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (
            LedgerHandle { tx },
            LedgerWriter {
                path: path.to_path_buf(),
                headers,
                rx,
            },
        )
    }

    /// Drain batches until every sender is dropped, then return rows written.
    ///
    /// The file is opened (and the header written) only when the first batch
    /// arrives, so a run that produces no rows leaves the ledger untouched.
    /// Each batch is flushed before the next is accepted; rows for finished
    /// products survive a later abort.
    pub async fn run(mut self) -> anyhow::Result<usize> {
        let mut writer: Option<csv::Writer<File>> = None;
        let mut rows_written = 0usize;

        while let Some(batch) = self.rx.recv().await {
            let w = match writer {
                Some(ref mut w) => w,
                None => writer.insert(open_append(&self.path, self.headers)?),
            };
            for row in &batch {
                w.write_record(row).context("ledger write failed")?;
            }
            w.flush().context("ledger flush failed")?;
            rows_written += batch.len();
        }
        Ok(rows_written)
    }
}

/// Open the ledger for appending, writing the header row when the file is
/// absent or empty.
fn open_append(path: &Path, headers: &[&str]) -> anyhow::Result<csv::Writer<File>> {
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open ledger {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        writer
            .write_record(headers)
            .context("cannot write ledger header")?;
        writer.flush().context("cannot flush ledger header")?;
    }
    Ok(writer)
}

/// Read the ledger's URL column into a membership set for resume filtering.
///
/// A missing ledger yields an empty set (fresh run).
pub fn resume_urls(path: &Path, url_column: &str) -> anyhow::Result<HashSet<String>> {
    if !path.exists() {
        return Ok(HashSet::new());
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cannot read ledger {}", path.display()))?;
    let idx = column_index(reader.headers()?, url_column)?;

    let mut urls = HashSet::new();
    for record in reader.records() {
        let record = record.context("malformed ledger row")?;
        if let Some(url) = record.get(idx) {
            urls.insert(url.to_string());
        }
    }
    Ok(urls)
}

/// Remove every row sharing the last-appended row's URL and rewrite the
/// ledger atomically (tmp file + rename). Returns the number of rows removed.
///
/// Guards against a partially-written multi-color product after the process
/// was killed mid-append: the last URL's row set may mix complete and
/// truncated variants, so all of it goes.
pub fn rollback_last_url(path: &Path, url_column: &str) -> anyhow::Result<usize> {
    if !path.exists() {
        return Ok(0);
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cannot read ledger {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let idx = column_index(&headers, url_column)?;

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .context("malformed ledger row")?;
    let last_url = match rows.last().and_then(|r| r.get(idx)) {
        Some(url) => url.to_string(),
        None => return Ok(0),
    };

    let kept: Vec<&csv::StringRecord> = rows
        .iter()
        .filter(|r| r.get(idx) != Some(last_url.as_str()))
        .collect();
    let removed = rows.len() - kept.len();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger".to_string());
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    let mut writer = csv::Writer::from_path(&tmp_path)
        .with_context(|| format!("cannot write {}", tmp_path.display()))?;
    writer.write_record(&headers)?;
    for row in kept {
        writer.write_record(row)?;
    }
    writer.flush()?;
    drop(writer);
    fs::rename(&tmp_path, path).context("cannot replace ledger")?;

    log::warn!("rolled back {removed} row(s) for {last_url}");
    Ok(removed)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> anyhow::Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("ledger has no '{name}' column"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: &[&str] = &["pcurl", "Name", "Color"];

    fn row(url: &str, name: &str, color: &str) -> Vec<String> {
        vec![url.to_string(), name.to_string(), color.to_string()]
    }

    async fn write_batches(path: &Path, batches: Vec<RowBatch>) -> usize {
        let (handle, writer) = LedgerWriter::channel(path, HEADERS);
        let task = tokio::spawn(writer.run());
        for batch in batches {
            handle.write(batch).await.unwrap();
        }
        drop(handle);
        task.await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn creates_file_with_header_on_first_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let written = write_batches(&path, vec![vec![row("u1", "Shoe", "White")]]).await;
        assert_eq!(written, 1);

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("pcurl,Name,Color"));
        assert_eq!(lines.next(), Some("u1,Shoe,White"));
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn appends_without_duplicate_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_batches(&path, vec![vec![row("u1", "Shoe", "White")]]).await;
        write_batches(&path, vec![vec![row("u2", "Boot", "Black")]]).await;

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(content.matches("pcurl").count(), 1);
    }

    #[tokio::test]
    async fn no_batches_leaves_missing_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let written = write_batches(&path, vec![]).await;
        assert_eq!(written, 0);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn no_batches_leaves_existing_file_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_batches(&path, vec![vec![row("u1", "Shoe", "White")]]).await;
        let before = fs::read(&path).unwrap();

        write_batches(&path, vec![]).await;
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn resume_urls_collects_url_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_batches(
            &path,
            vec![
                vec![row("u1", "Shoe", "White"), row("u1", "Shoe", "Black")],
                vec![row("u2", "Boot", "Red")],
            ],
        )
        .await;

        let urls = resume_urls(&path, "pcurl").unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains("u1"));
        assert!(urls.contains("u2"));
    }

    #[test]
    fn resume_urls_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let urls = resume_urls(&dir.path().join("absent.csv"), "pcurl").unwrap();
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn rollback_removes_all_rows_of_last_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        // Interleaved rows: u2 appears before and after u1's final row
        write_batches(
            &path,
            vec![
                vec![row("u2", "Boot", "Red")],
                vec![row("u1", "Shoe", "White")],
                vec![row("u2", "Boot", "Blue"), row("u2", "Boot", "Green")],
            ],
        )
        .await;

        let removed = rollback_last_url(&path, "pcurl").unwrap();
        assert_eq!(removed, 3);

        let urls = resume_urls(&path, "pcurl").unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("u1"));
    }

    #[tokio::test]
    async fn rollback_on_header_only_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_batches(&path, vec![vec![row("u1", "Shoe", "White")]]).await;
        rollback_last_url(&path, "pcurl").unwrap();

        // Only the header remains; a second rollback removes nothing
        assert_eq!(rollback_last_url(&path, "pcurl").unwrap(), 0);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn rollback_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            rollback_last_url(&dir.path().join("absent.csv"), "pcurl").unwrap(),
            0
        );
    }
}
