mod advisory;
mod monitor;
mod probe;

pub use advisory::{
    check_memory_availability, check_memory_pressure, estimate_file, format_file_size, memory_info,
    validate_file, FileEstimate, MemoryAvailability, MemoryPressure, SizeAdvisory
};
pub use monitor::{MemoryMonitor, MemoryReport, MemoryUsage};
pub use probe::{MemoryProbe, MemorySnapshot, SystemMemoryProbe, UnavailableProbe};
