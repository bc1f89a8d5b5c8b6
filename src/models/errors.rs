use std::fmt::Display;

use thiserror::Error;

/// Coarse classification of a [`ParseError`] for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ParseErrorKind {
    InvalidFile,
    UnsupportedFormat,
    MalformedHeader,
    DecodeFailure,
    Cancelled
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("Invalid file: {reason}")]
    InvalidFile {
        reason: String
    },
    #[error("Unsupported file format [{extension}]. Supported formats: csv, xlsx, xls, dbf")]
    UnsupportedFormat {
        extension: String
    },
    #[error("Malformed header: {reason}")]
    MalformedHeader {
        reason: String
    },
    #[error("Failed to decode file: {reason}")]
    DecodeFailure {
        reason: String
    },
    #[error("Parsing was cancelled")]
    Cancelled
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::InvalidFile { .. } => ParseErrorKind::InvalidFile,
            Self::UnsupportedFormat { .. } => ParseErrorKind::UnsupportedFormat,
            Self::MalformedHeader { .. } => ParseErrorKind::MalformedHeader,
            Self::DecodeFailure { .. } => ParseErrorKind::DecodeFailure,
            Self::Cancelled => ParseErrorKind::Cancelled
        }
    }

    pub fn empty_file() -> Self {
        Self::InvalidFile { reason: "File is empty".to_string() }
    }

    pub fn file_too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::InvalidFile {
            reason: format!(
                "File size {size_bytes} bytes exceeds the {} MB limit",
                max_bytes / (1024 * 1024)
            )
        }
    }

    pub fn unsupported_format(extension: &str) -> Self {
        Self::UnsupportedFormat { extension: extension.to_string() }
    }

    pub fn malformed_header(reason: impl Into<String>) -> Self {
        Self::MalformedHeader { reason: reason.into() }
    }

    pub fn no_worksheets() -> Self {
        Self::malformed_header("Workbook contains no worksheets")
    }

    pub fn decode(reason: impl Display) -> Self {
        Self::DecodeFailure { reason: reason.to_string() }
    }

    pub fn truncated_record(record_index: u32, offset: usize) -> Self {
        Self::DecodeFailure {
            reason: format!("Record [{record_index}] at byte offset [{offset}] runs past the end of the file")
        }
    }

    pub fn worker_terminated() -> Self {
        Self::decode("Parse worker terminated before sending a result")
    }
}
