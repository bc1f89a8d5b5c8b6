/// Rows processed between two progress events and cooperative yields.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Files above this size are refused before any decoding starts.
pub const MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// Settings for one parse run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseOptions {
    /// Exact BS date (`dd/mm/yyyy`) a row must carry to be kept. `None` keeps every row.
    pub filter_date: Option<String>,
    pub chunk_size: usize,
    pub normalize_member_codes: bool,
    pub max_file_size: u64
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            filter_date: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            normalize_member_codes: true,
            max_file_size: MAX_FILE_SIZE_BYTES
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty or whitespace-only date disables filtering.
    pub fn with_filter_date(mut self, filter_date: impl Into<String>) -> Self {
        let filter_date = filter_date.into().trim().to_string();
        self.filter_date = (!filter_date.is_empty()).then_some(filter_date);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_member_code_normalization(mut self, normalize: bool) -> Self {
        self.normalize_member_codes = normalize;
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }
}
