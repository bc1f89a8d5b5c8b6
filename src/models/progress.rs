use serde::Serialize;

use crate::types::Phase;

/// Transient progress event handed to the caller's callback.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ParseProgress {
    /// Percentage in `0..=100`.
    pub progress: u8,
    pub message: String,
    pub phase: Phase
}

impl ParseProgress {
    pub fn new(progress: u8, message: impl Into<String>, phase: Phase) -> Self {
        Self {
            progress: progress.min(100),
            message: message.into(),
            phase
        }
    }

    pub fn complete() -> Self {
        Self::new(100, "Complete!", Phase::Complete)
    }
}
