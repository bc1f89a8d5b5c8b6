use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use tracing::debug;

use crate::models::{ParseError, RECORD_WIDTH};
use crate::parsers::Row;

/// Streams data rows out of the first worksheet of an XLSX or XLS workbook.
///
/// The workbook itself is decoded up front by calamine; rows are then read by direct cell
/// lookup so only the current row is materialized as text. Row 0 is the header. Rows where
/// every cell is empty are structural gaps and are skipped without being counted.
pub struct SheetRows {
    range: Range<Data>,
    next_row: u32,
    last_row: Option<u32>
}

impl SheetRows {
    pub fn new(bytes: &[u8]) -> Result<Self, ParseError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|error| ParseError::decode(format!("Unable to open workbook: {error}")))?;

        let sheet_name = workbook.sheet_names()
            .first()
            .cloned()
            .ok_or_else(ParseError::no_worksheets)?;

        let range = workbook.worksheet_range(&sheet_name)
            .map_err(|error| ParseError::decode(format!("Unable to read worksheet [{sheet_name}]: {error}")))?;

        let last_row = range.end().map(|(row, _)| row);

        debug!("Worksheet [{sheet_name}] spans rows up to {last_row:?}");

        Ok(Self {
            range,
            next_row: 1,
            last_row
        })
    }

    pub fn total_rows(&self) -> usize {
        self.last_row.map(|row| row as usize).unwrap_or_default()
    }

    fn cell_text(&self, row: u32, column: u32) -> String {
        match self.range.get_value((row, column)) {
            None | Some(Data::Empty) => String::new(),
            Some(cell) => cell.to_string().trim().to_string()
        }
    }
}

impl Iterator for SheetRows {
    type Item = Result<Row, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let last_row = self.last_row?;

        while self.next_row <= last_row {
            let row = self.next_row;
            self.next_row += 1;

            let cells: Row = (0..RECORD_WIDTH as u32)
                .map(|column| self.cell_text(row, column))
                .collect();

            if cells.iter().all(String::is_empty) {
                continue;
            }

            return Some(Ok(cells));
        }

        None
    }
}
