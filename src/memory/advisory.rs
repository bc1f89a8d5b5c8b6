use tracing::warn;

use crate::memory::MemoryProbe;
use crate::models::ParseError;
use crate::parsers::FileFormat;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const RECORDS_PER_KB: f64 = 0.8;
const MEDIUM_FILE_MB: f64 = 20.0;
const LARGE_FILE_MB: f64 = 50.0;
const MAX_FILE_MB: f64 = 100.0;
const HIGH_PRESSURE_PERCENT: f64 = 75.0;
const CRITICAL_PRESSURE_PERCENT: f64 = 90.0;
const MIN_HEADROOM_BYTES: u64 = 200 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SizeAdvisory {
    /// 20 to 50 MB.
    Medium,
    /// 50 to 100 MB.
    Large,
    /// Above 100 MB, refused outright.
    TooLarge
}

impl SizeAdvisory {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Medium => "Medium file size. Processing may take 30-60 seconds.",
            Self::Large => "Large file detected. Processing may take 1-2 minutes.",
            Self::TooLarge => "File too large (>100MB). Processing may fail."
        }
    }
}

/// Instant, size-only estimate of what parsing a file will cost.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEstimate {
    pub estimated_records: u64,
    /// Rounded to two decimals.
    pub file_size_mb: f64,
    pub can_handle: bool,
    pub advisory: Option<SizeAdvisory>
}

pub fn estimate_file(size_bytes: u64) -> FileEstimate {
    let size_mb = size_bytes as f64 / BYTES_PER_MB;
    let estimated_records = (size_bytes as f64 / 1024.0 * RECORDS_PER_KB).round() as u64;

    let advisory = if size_mb > MAX_FILE_MB {
        Some(SizeAdvisory::TooLarge)
    } else if size_mb > LARGE_FILE_MB {
        Some(SizeAdvisory::Large)
    } else if size_mb > MEDIUM_FILE_MB {
        Some(SizeAdvisory::Medium)
    } else {
        None
    };

    FileEstimate {
        estimated_records,
        file_size_mb: (size_mb * 100.0).round() / 100.0,
        can_handle: advisory != Some(SizeAdvisory::TooLarge),
        advisory
    }
}

/// Pre-flight gate run before a file is handed to a worker.
///
/// # Errors
/// - `UnsupportedFormat` for anything but csv, xlsx, xls or dbf.
/// - `InvalidFile` for an empty file or one larger than `max_bytes`.
pub fn validate_file(file_name: &str, size_bytes: u64, max_bytes: u64) -> Result<(), ParseError> {
    FileFormat::from_file_name(file_name)?;

    if size_bytes == 0 {
        return Err(ParseError::empty_file());
    }

    if size_bytes > max_bytes {
        return Err(ParseError::file_too_large(size_bytes, max_bytes));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MemoryPressure {
    Normal,
    /// Above 75% of the limit.
    High,
    /// Above 90% of the limit.
    Critical
}

impl MemoryPressure {
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::High => Some("Memory usage is high (>75%). Large file operations may be slower."),
            Self::Critical => Some("Memory usage is very high (>90%). Consider closing other applications before parsing.")
        }
    }
}

/// Classifies current memory use and logs a warning when it is high.
pub fn check_memory_pressure(probe: &dyn MemoryProbe) -> MemoryPressure {
    let Some(snapshot) = probe.snapshot() else {
        return MemoryPressure::Normal;
    };

    let percent_used = snapshot.percent_used();
    let pressure = if percent_used > CRITICAL_PRESSURE_PERCENT {
        MemoryPressure::Critical
    } else if percent_used > HIGH_PRESSURE_PERCENT {
        MemoryPressure::High
    } else {
        MemoryPressure::Normal
    };

    if let Some(warning) = pressure.warning() {
        warn!("{warning} ({percent_used:.1}% used)");
    }

    pressure
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MemoryAvailability {
    pub has_introspection: bool,
    pub available_bytes: Option<u64>,
    pub used_bytes: Option<u64>,
    pub limit_bytes: Option<u64>,
    /// At least 200 MB of headroom, or no way to tell.
    pub can_process_large_file: bool
}

pub fn check_memory_availability(probe: &dyn MemoryProbe) -> MemoryAvailability {
    match probe.snapshot() {
        Some(snapshot) => MemoryAvailability {
            has_introspection: true,
            available_bytes: Some(snapshot.available_bytes()),
            used_bytes: Some(snapshot.used_bytes),
            limit_bytes: Some(snapshot.limit_bytes),
            can_process_large_file: snapshot.available_bytes() > MIN_HEADROOM_BYTES
        },
        None => MemoryAvailability {
            has_introspection: false,
            available_bytes: None,
            used_bytes: None,
            limit_bytes: None,
            can_process_large_file: true
        }
    }
}

/// One-line memory summary for logs.
pub fn memory_info(probe: &dyn MemoryProbe) -> String {
    match probe.snapshot() {
        Some(snapshot) => format!(
            "Memory: {}MB / {}MB ({}%)",
            to_mb(snapshot.used_bytes),
            to_mb(snapshot.limit_bytes),
            snapshot.percent_used().round() as u64
        ),
        None => "Memory info not available".to_string()
    }
}

/// Human readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`, `1.25 GB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", (value * 100.0).round() / 100.0, UNITS[unit])
}

pub(crate) fn to_mb(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_MB).round() as u64
}
