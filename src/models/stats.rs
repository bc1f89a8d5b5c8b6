use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::models::CollectionRecord;
use crate::types::BsDate;

/// Earliest and latest BS dates seen in a file.
///
/// Ordering is a plain string comparison of `dd/mm/yyyy` values, so the range is only
/// advisory across month and year boundaries.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DateRange {
    pub earliest: BsDate,
    pub latest: BsDate
}

/// Aggregate figures for one parse run.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FileStats {
    /// Rows that passed the structural column check.
    pub total_records: usize,
    /// Rows that also matched the date filter.
    pub filtered_records: usize,
    /// Distinct BS dates across every decoded row, filtered or not.
    pub unique_dates: usize,
    pub date_range: Option<DateRange>,
    /// Wall-clock time of the whole run in milliseconds.
    pub processing_time_ms: u64
}

impl Display for FileStats {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "total={} filtered={} unique_dates={}",
            self.total_records, self.filtered_records, self.unique_dates
        )?;

        if let Some(range) = &self.date_range {
            write!(formatter, " range={}..{}", range.earliest, range.latest)?;
        }

        write!(formatter, " time={}ms", self.processing_time_ms)
    }
}

/// Terminal value of a successful parse: the matching records and the run statistics.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseResult {
    pub records: Vec<CollectionRecord>,
    pub stats: FileStats
}
