use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Stage of a parse run reported alongside each progress event.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Reading,
    Parsing,
    Filtering,
    Complete
}

impl Display for Phase {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Reading => "reading",
            Phase::Parsing => "parsing",
            Phase::Filtering => "filtering",
            Phase::Complete => "complete"
        };

        formatter.write_str(label)
    }
}
