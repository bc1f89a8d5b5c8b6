mod parse_worker;
#[cfg(test)]
mod tests;

pub use parse_worker::{JobState, ParseJob, ParseRequest, ParseWorker, WorkerMessage};
