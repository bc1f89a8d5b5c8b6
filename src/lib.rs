//! Streaming ingestion of milk collection exports.
//!
//! CSV, XLSX/XLS and DBF files are decoded in a single pass on a dedicated worker task,
//! filtered by BS collection date while they are read, and returned together with run
//! statistics. Progress is streamed back to the caller as the file is processed.

pub mod actors;
pub mod engine;
#[cfg(test)]
mod fixtures;
pub mod memory;
pub mod models;
pub mod parsers;
pub mod types;

pub use actors::{JobState, ParseJob, ParseRequest, ParseWorker, WorkerMessage};
pub use engine::{ParseOptions, StreamingParser, DEFAULT_CHUNK_SIZE, MAX_FILE_SIZE_BYTES};
pub use models::{CollectionRecord, DateRange, FileStats, ParseError, ParseErrorKind, ParseProgress, ParseResult};
pub use types::{MemberCode, Phase};

/// Parses a collection export on its own worker and waits for the outcome.
///
/// Pre-flight validation (extension, empty file, size limit) runs on the caller's side and
/// fails without spawning anything. Progress events are delivered in row order and end
/// with a `Complete` event when the parse succeeds.
///
/// # Errors
/// Returns the `ParseError` raised by validation or by the worker.
pub async fn parse_streaming_file<F>(bytes: Vec<u8>, file_name: &str, options: ParseOptions, on_progress: F) -> Result<ParseResult, ParseError>
where
    F: FnMut(ParseProgress)
{
    memory::validate_file(file_name, bytes.len() as u64, options.max_file_size)?;

    let request = ParseRequest {
        bytes,
        file_name: file_name.to_string(),
        options
    };

    ParseWorker::spawn()
        .dispatch(request)?
        .wait(on_progress)
        .await
}
