use std::time::Instant;

use tokio::task::yield_now;
use tracing::{debug, info};

use crate::engine::{ParseOptions, StatsAccumulator};
use crate::models::{ParseError, ParseProgress, ParseResult};
use crate::parsers::{FileFormat, RowReader};
use crate::types::Phase;

const READING_DONE: u8 = 10;
const PARSING_BASE: u8 = 10;
const PARSING_SPAN: u8 = 80;
const FINALIZING: u8 = 95;

/// Drives a format decoder row by row, filtering and counting in the same pass.
///
/// Every `chunk_size` rows a progress event is emitted and the task yields back to the
/// scheduler, so a long parse shares its thread with other work.
pub struct StreamingParser {
    options: ParseOptions
}

impl StreamingParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses `bytes` as the format implied by `file_name`.
    ///
    /// Only rows matching the filter date are materialized as records, so peak memory
    /// follows the filtered row count rather than the size of the file.
    ///
    /// # Errors
    /// Returns `ParseError` if:
    /// - The extension is not csv, xlsx, xls or dbf.
    /// - A DBF header is inconsistent or a workbook has no worksheets.
    /// - The decoder fails part way through (for example a truncated DBF record area).
    pub async fn parse<F>(&self, bytes: &[u8], file_name: &str, mut on_progress: F) -> Result<ParseResult, ParseError>
    where
        F: FnMut(ParseProgress)
    {
        let timer = Instant::now();

        on_progress(ParseProgress::new(0, "Starting file processing...", Phase::Reading));

        let format = FileFormat::from_file_name(file_name)?;
        on_progress(ParseProgress::new(READING_DONE, format!("Reading {} file...", format.label()), Phase::Reading));

        let rows = RowReader::open(format, bytes)?;
        let total_rows = rows.total_rows();
        on_progress(ParseProgress::new(PARSING_BASE, format!("Parsing {} data...", format.label()), Phase::Parsing));

        let chunk_size = self.options.chunk_size.max(1);
        let mut accumulator = StatsAccumulator::new(self.options.filter_date.clone(), self.options.normalize_member_codes);
        let mut records = Vec::new();

        for (index, row) in rows.enumerate() {
            if let Some(record) = accumulator.observe(row?) {
                records.push(record);
            }

            let rows_processed = index + 1;

            if rows_processed % chunk_size == 0 {
                on_progress(ParseProgress::new(
                    parsing_progress(rows_processed, total_rows),
                    format!("Processing row {rows_processed} of {total_rows}..."),
                    Phase::Parsing
                ));

                debug!("Processed {rows_processed} of {total_rows} rows from [{file_name}], {} kept", accumulator.filtered_records());

                yield_now().await;
            }
        }

        on_progress(ParseProgress::new(FINALIZING, "Finalizing results...", Phase::Filtering));

        if accumulator.skipped_rows() > 0 {
            debug!("Skipped {} short rows in [{file_name}]", accumulator.skipped_rows());
        }

        let stats = accumulator.finish(timer.elapsed());

        info!("Parsed [{file_name}] as {}: {stats}", format.label());

        Ok(ParseResult { records, stats })
    }
}

fn parsing_progress(rows_processed: usize, total_rows: usize) -> u8 {
    if total_rows == 0 {
        return PARSING_BASE;
    }

    let fraction = (rows_processed as f64 / total_rows as f64).min(1.0);

    PARSING_BASE + (fraction * PARSING_SPAN as f64).round() as u8
}
