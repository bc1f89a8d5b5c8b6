use std::collections::BTreeSet;
use std::time::Duration;

use crate::models::{BS_DATE_COLUMN, CollectionRecord, DateRange, FileStats, MIN_FIELDS};
use crate::parsers::Row;
use crate::types::BsDate;

/// Running fold over the decoded rows of one parse run, consumed by [`StatsAccumulator::finish`].
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    filter_date: Option<BsDate>,
    normalize: bool,
    total_records: usize,
    filtered_records: usize,
    skipped_rows: usize,
    dates: BTreeSet<BsDate>
}

impl StatsAccumulator {
    pub fn new(filter_date: Option<BsDate>, normalize: bool) -> Self {
        Self {
            filter_date,
            normalize,
            total_records: 0,
            filtered_records: 0,
            skipped_rows: 0,
            dates: BTreeSet::new()
        }
    }

    /// Folds one row in and returns the record when the row is well formed and matches the filter.
    ///
    /// The row's date joins the unique-date set even when the row itself is too short to
    /// become a record. Rows that do not match the filter are never turned into records.
    pub fn observe(&mut self, row: Row) -> Option<CollectionRecord> {
        let date = row.get(BS_DATE_COLUMN).map(String::as_str).unwrap_or_default();

        if !date.is_empty() && !self.dates.contains(date) {
            self.dates.insert(date.to_string());
        }

        if row.len() < MIN_FIELDS {
            self.skipped_rows += 1;
            return None;
        }

        self.total_records += 1;

        if !self.filter_date.as_deref().is_none_or(|filter| filter == date) {
            return None;
        }

        self.filtered_records += 1;

        Some(CollectionRecord::from_fields(row, self.normalize))
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn filtered_records(&self) -> usize {
        self.filtered_records
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn finish(self, elapsed: Duration) -> FileStats {
        let date_range = match (self.dates.first(), self.dates.last()) {
            (Some(earliest), Some(latest)) => Some(DateRange {
                earliest: earliest.clone(),
                latest: latest.clone()
            }),
            _ => None
        };

        FileStats {
            total_records: self.total_records,
            filtered_records: self.filtered_records,
            unique_dates: self.dates.len(),
            date_range,
            processing_time_ms: elapsed.as_millis() as u64
        }
    }
}
