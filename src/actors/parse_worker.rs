use tokio::spawn;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::engine::{ParseOptions, StreamingParser};
use crate::models::{ParseError, ParseProgress, ParseResult};

/// The single message a worker accepts on its mailbox.
#[derive(Debug)]
pub struct ParseRequest {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub options: ParseOptions
}

/// Everything a worker sends back: any number of `Progress` messages followed by exactly
/// one `Result` or `Error`.
#[derive(Debug)]
pub enum WorkerMessage {
    Progress(ParseProgress),
    Result(ParseResult),
    Error(ParseError)
}

impl WorkerMessage {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerMessage::Progress(_))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum JobState {
    Dispatched,
    Completed,
    Failed,
    Cancelled
}

/// An idle parse actor waiting for its request.
///
/// Each worker owns one spawned task and handles one request. Dropping an idle worker
/// tears the task down.
pub struct ParseWorker {
    mailbox: mpsc::Sender<ParseRequest>,
    events: Option<mpsc::UnboundedReceiver<WorkerMessage>>,
    handle: Option<JoinHandle<()>>
}

impl ParseWorker {
    /// Spawns a new actor on the current tokio runtime.
    pub fn spawn() -> Self {
        let (mailbox, mut requests) = mpsc::channel::<ParseRequest>(1);
        let (sender, events) = mpsc::unbounded_channel();

        let handle = spawn(async move {
            let Some(request) = requests.recv().await else {
                return;
            };

            let ParseRequest { bytes, file_name, options } = request;
            let parser = StreamingParser::new(options);
            let progress_sender = sender.clone();

            let outcome = parser.parse(&bytes, &file_name, |progress| {
                //NOTE: A send only fails once the caller is gone, the terminal send below reports that
                let _ = progress_sender.send(WorkerMessage::Progress(progress));
            }).await;

            let message = match outcome {
                Ok(result) => WorkerMessage::Result(result),
                Err(error) => {
                    error!("Parsing [{file_name}] failed: {error}");
                    WorkerMessage::Error(error)
                }
            };

            if sender.send(message).is_err() {
                debug!("Caller went away before the result for [{file_name}] was delivered");
            }
        });

        Self {
            mailbox,
            events: Some(events),
            handle: Some(handle)
        }
    }

    /// Hands the request to the actor and returns the job tracking it.
    ///
    /// # Errors
    /// Returns `ParseError::DecodeFailure` if the actor task is no longer running.
    pub fn dispatch(mut self, request: ParseRequest) -> Result<ParseJob, ParseError> {
        let file_name = request.file_name.clone();

        self.mailbox.try_send(request)
            .map_err(|_| ParseError::worker_terminated())?;

        debug!("Dispatched [{file_name}] to parse worker");

        Ok(ParseJob {
            events: self.events.take(),
            handle: self.handle.take(),
            state: JobState::Dispatched
        })
    }
}

impl Drop for ParseWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// A dispatched request: the caller's side of the message channel.
///
/// The worker task is disposed exactly once, when a terminal message is observed, when
/// [`ParseJob::cancel`] is called, or when the job is dropped. After disposal no further
/// messages are delivered.
pub struct ParseJob {
    events: Option<mpsc::UnboundedReceiver<WorkerMessage>>,
    handle: Option<JoinHandle<()>>,
    state: JobState
}

impl ParseJob {
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Waits for the next message. Returns `None` once the job has been disposed.
    ///
    /// A worker that stops without a terminal message (for example because it panicked) is
    /// reported as a `DecodeFailure` error message.
    pub async fn next_message(&mut self) -> Option<WorkerMessage> {
        let events = self.events.as_mut()?;

        let message = events.recv().await
            .unwrap_or_else(|| WorkerMessage::Error(ParseError::worker_terminated()));

        match &message {
            WorkerMessage::Progress(_) => {}
            WorkerMessage::Result(_) => self.finish(JobState::Completed),
            WorkerMessage::Error(_) => self.finish(JobState::Failed)
        }

        Some(message)
    }

    /// Stops the job. Safe to call at any time; a no-op once a terminal message was seen.
    pub fn cancel(&mut self) {
        if self.state == JobState::Dispatched {
            debug!("Parse job cancelled by caller");
            self.finish(JobState::Cancelled);
        }
    }

    /// Drives the job to completion, forwarding progress to `on_progress`.
    ///
    /// A final `Complete` progress event is emitted just before a successful result is
    /// returned.
    pub async fn wait<F>(mut self, mut on_progress: F) -> Result<ParseResult, ParseError>
    where
        F: FnMut(ParseProgress)
    {
        while let Some(message) = self.next_message().await {
            match message {
                WorkerMessage::Progress(progress) => on_progress(progress),
                WorkerMessage::Result(result) => {
                    on_progress(ParseProgress::complete());
                    return Ok(result);
                }
                WorkerMessage::Error(error) => return Err(error)
            }
        }

        Err(ParseError::Cancelled)
    }

    fn finish(&mut self, state: JobState) {
        self.state = state;
        self.dispose();
    }

    fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }

        self.events = None;
    }
}

impl Drop for ParseJob {
    fn drop(&mut self) {
        self.cancel();
        self.dispose();
    }
}
