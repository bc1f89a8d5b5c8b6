mod csv_rows;
mod dbf_rows;
mod sheet_rows;

pub use csv_rows::CsvRows;
pub use dbf_rows::{DbfField, DbfFieldType, DbfHeader, DbfRows};
pub use sheet_rows::SheetRows;

use crate::models::ParseError;

/// Trimmed positional cells of one decoded row.
pub type Row = Vec<String>;

/// Input container, chosen from the file extension.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
    Dbf
}

impl FileFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, ParseError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xls" => Ok(Self::Spreadsheet),
            "dbf" => Ok(Self::Dbf),
            _ => Err(ParseError::unsupported_format(&extension))
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Spreadsheet => "Excel",
            Self::Dbf => "DBF"
        }
    }
}

/// Single-pass row decoder over a borrowed file buffer.
///
/// Every variant yields the same positional rows, so the streaming controller never needs
/// to know which container it is reading.
pub enum RowReader<'a> {
    Csv(CsvRows<'a>),
    Spreadsheet(SheetRows),
    Dbf(DbfRows<'a>)
}

impl<'a> RowReader<'a> {
    /// Opens the decoder for `format`. Header-level problems surface here, before any row is read.
    pub fn open(format: FileFormat, bytes: &'a [u8]) -> Result<Self, ParseError> {
        match format {
            FileFormat::Csv => Ok(Self::Csv(CsvRows::new(bytes))),
            FileFormat::Spreadsheet => SheetRows::new(bytes).map(Self::Spreadsheet),
            FileFormat::Dbf => DbfRows::new(bytes).map(Self::Dbf)
        }
    }

    /// Expected number of data rows, used only to scale progress.
    pub fn total_rows(&self) -> usize {
        match self {
            Self::Csv(rows) => rows.total_rows(),
            Self::Spreadsheet(rows) => rows.total_rows(),
            Self::Dbf(rows) => rows.total_rows()
        }
    }
}

impl Iterator for RowReader<'_> {
    type Item = Result<Row, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Csv(rows) => rows.next(),
            Self::Spreadsheet(rows) => rows.next(),
            Self::Dbf(rows) => rows.next()
        }
    }
}
