mod accumulator;
mod options;
mod streaming;

pub use accumulator::StatsAccumulator;
pub use options::{DEFAULT_CHUNK_SIZE, MAX_FILE_SIZE_BYTES, ParseOptions};
pub use streaming::StreamingParser;
