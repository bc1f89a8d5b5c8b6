use super::{JobState, ParseRequest, ParseWorker, WorkerMessage};
use crate::engine::ParseOptions;
use crate::fixtures::{collection_row, csv_bytes, dbf_bytes};
use crate::models::{ParseError, ParseErrorKind};
use crate::types::Phase;

use anyhow::{anyhow, Result};

fn csv_request(rows: usize, options: ParseOptions) -> ParseRequest {
    let dataset: Vec<Vec<String>> = (1..=rows as u32)
        .map(|serial| collection_row(serial, if serial % 2 == 0 { "15/07/2082" } else { "14/07/2082" }, "0001"))
        .collect();

    ParseRequest {
        bytes: csv_bytes(&dataset),
        file_name: "collection.csv".to_string(),
        options
    }
}

#[tokio::test]
async fn test_worker_sends_progress_then_exactly_one_result() -> Result<()> {
    let mut job = ParseWorker::spawn().dispatch(csv_request(10, ParseOptions::new().with_chunk_size(3)))?;
    let mut messages = Vec::new();

    while let Some(message) = job.next_message().await {
        messages.push(message);
    }

    let terminal_count = messages.iter().filter(|message| message.is_terminal()).count();

    assert_eq!(terminal_count, 1);
    assert!(messages.last().is_some_and(|message| matches!(message, WorkerMessage::Result(_))));
    assert!(messages.len() > 1);
    assert_eq!(job.state(), JobState::Completed);

    let percentages: Vec<u8> = messages.iter()
        .filter_map(|message| match message {
            WorkerMessage::Progress(progress) => Some(progress.progress),
            _ => None
        })
        .collect();

    assert!(percentages.windows(2).all(|pair| pair[0] <= pair[1]));

    Ok(())
}

#[tokio::test]
async fn test_wait_returns_the_filtered_result_and_reports_completion() -> Result<()> {
    let options = ParseOptions::new().with_filter_date("14/07/2082");
    let job = ParseWorker::spawn().dispatch(csv_request(6, options))?;
    let mut phases = Vec::new();

    let result = job.wait(|progress| phases.push((progress.progress, progress.phase))).await?;

    assert_eq!(result.stats.total_records, 6);
    assert_eq!(result.stats.filtered_records, 3);
    assert_eq!(result.records.len(), 3);
    assert_eq!(phases.last(), Some(&(100, Phase::Complete)));

    Ok(())
}

#[tokio::test]
async fn test_cancel_right_after_dispatch_never_delivers_a_result() -> Result<()> {
    let mut job = ParseWorker::spawn().dispatch(csv_request(5_000, ParseOptions::new()))?;

    job.cancel();

    assert_eq!(job.state(), JobState::Cancelled);
    assert!(job.next_message().await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_cancel_after_completion_keeps_the_completed_state() -> Result<()> {
    let mut job = ParseWorker::spawn().dispatch(csv_request(2, ParseOptions::new()))?;

    while job.next_message().await.is_some() {}

    job.cancel();

    assert_eq!(job.state(), JobState::Completed);

    Ok(())
}

#[tokio::test]
async fn test_cancelled_job_resolves_wait_as_cancelled() -> Result<()> {
    let mut job = ParseWorker::spawn().dispatch(csv_request(100, ParseOptions::new()))?;

    job.cancel();

    let error = job.wait(|_| {}).await.err().ok_or_else(|| anyhow!("cancelled job returned a result"))?;

    assert_eq!(error, ParseError::Cancelled);

    Ok(())
}

#[tokio::test]
async fn test_decoder_errors_arrive_as_a_single_error_message() -> Result<()> {
    let mut bytes = dbf_bytes(&[collection_row(1, "14/07/2082", "1"), collection_row(2, "14/07/2082", "2")], &[]);
    bytes.truncate(bytes.len() - 30);

    let request = ParseRequest {
        bytes,
        file_name: "export.dbf".to_string(),
        options: ParseOptions::new()
    };

    let mut job = ParseWorker::spawn().dispatch(request)?;
    let mut errors = Vec::new();
    let mut results = 0;

    while let Some(message) = job.next_message().await {
        match message {
            WorkerMessage::Error(error) => errors.push(error),
            WorkerMessage::Result(_) => results += 1,
            WorkerMessage::Progress(_) => {}
        }
    }

    assert_eq!(results, 0);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind(), ParseErrorKind::DecodeFailure);
    assert_eq!(job.state(), JobState::Failed);

    Ok(())
}

#[tokio::test]
async fn test_unsupported_format_is_reported_through_the_channel() -> Result<()> {
    let request = ParseRequest {
        bytes: b"irrelevant".to_vec(),
        file_name: "records.txt".to_string(),
        options: ParseOptions::new()
    };

    let result = ParseWorker::spawn().dispatch(request)?.wait(|_| {}).await;

    assert_eq!(result.err().map(|error| error.kind()), Some(ParseErrorKind::UnsupportedFormat));

    Ok(())
}

#[tokio::test]
async fn test_dropping_an_idle_worker_is_harmless() {
    let worker = ParseWorker::spawn();

    drop(worker);
}
