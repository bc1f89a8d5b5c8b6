mod errors;
mod progress;
mod record;
mod stats;

pub use errors::{ParseError, ParseErrorKind};
pub use progress::ParseProgress;
pub use record::{BS_DATE_COLUMN, CollectionRecord, MEMBER_CODE_COLUMN, MIN_FIELDS, RECORD_WIDTH};
pub use stats::{DateRange, FileStats, ParseResult};
