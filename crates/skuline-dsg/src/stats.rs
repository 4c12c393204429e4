//! Run summary — tagged task outcomes aggregated for the final report

use std::io::IsTerminal;
use std::time::Duration;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

/// Aggregated counts for one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Links read from the input chunk
    pub input_links: usize,
    /// Links already present in the ledger
    pub skipped_resume: usize,
    /// Products whose rows were queued
    pub saved_products: usize,
    /// Variant rows queued across all saved products
    pub rows: usize,
    /// Primary fetches answered with a non-200 status
    pub no_data: usize,
    /// Documents skipped as malformed
    pub malformed: usize,
    /// Tasks cancelled by an abort
    pub aborted: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn format_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Run Summary")
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Count").fg(Color::Cyan),
            ]);

        table.add_row(vec![Cell::new("Input links"), Cell::new(self.input_links)]);
        table.add_row(vec![Cell::new("Already in ledger"), Cell::new(self.skipped_resume)]);
        table.add_row(vec![
            Cell::new("Products saved").fg(Color::Green),
            Cell::new(self.saved_products).fg(Color::Green),
        ]);
        table.add_row(vec![Cell::new("Variant rows"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("No data"), Cell::new(self.no_data)]);
        table.add_row(vec![
            Cell::new("Malformed").fg(if self.malformed > 0 {
                Color::Yellow
            } else {
                Color::Reset
            }),
            Cell::new(self.malformed),
        ]);
        table.add_row(vec![Cell::new("Aborted"), Cell::new(self.aborted)]);
        table.add_row(vec![
            Cell::new("Elapsed"),
            Cell::new(format!("{:.1}s", self.elapsed.as_secs_f64())),
        ]);
        table.to_string()
    }

    pub fn print(&self) {
        eprintln!("\n{}", self.format_table());
    }

    pub fn log(&self) {
        log::info!(
            "run summary: {} input, {} resumed, {} saved ({} rows), {} no data, {} malformed, {} aborted [{:.1}s]",
            self.input_links,
            self.skipped_resume,
            self.saved_products,
            self.rows,
            self.no_data,
            self.malformed,
            self.aborted,
            self.elapsed.as_secs_f64()
        );
    }

    /// Table on a TTY, log line otherwise.
    pub fn report(&self) {
        if std::io::stderr().is_terminal() {
            self.print();
        } else {
            self.log();
        }
    }
}
