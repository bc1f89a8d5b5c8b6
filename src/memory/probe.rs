use std::sync::Mutex;

use sysinfo::{get_current_pid, ProcessesToUpdate, System};

/// One reading of memory use against the limit it is measured against.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MemorySnapshot {
    pub used_bytes: u64,
    pub limit_bytes: u64
}

impl MemorySnapshot {
    pub fn percent_used(&self) -> f64 {
        if self.limit_bytes == 0 {
            return 0.0;
        }

        self.used_bytes as f64 / self.limit_bytes as f64 * 100.0
    }

    pub fn available_bytes(&self) -> u64 {
        self.limit_bytes.saturating_sub(self.used_bytes)
    }
}

/// Host memory introspection. Returning `None` means the capability is unavailable and
/// every advisory check passes optimistically.
pub trait MemoryProbe: Send + Sync + 'static {
    /// System-wide use against the memory limit, used for pressure and headroom checks.
    fn snapshot(&self) -> Option<MemorySnapshot>;

    /// Resident memory of this process, used to track what a parse itself costs.
    fn process_bytes(&self) -> Option<u64> {
        self.snapshot().map(|snapshot| snapshot.used_bytes)
    }
}

/// Probe backed by `sysinfo`. Snapshots are system-wide used memory against total memory,
/// process readings are the resident set of the current process.
pub struct SystemMemoryProbe {
    system: Mutex<System>
}

impl SystemMemoryProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new())
        }
    }
}

impl Default for SystemMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SystemMemoryProbe {
    fn snapshot(&self) -> Option<MemorySnapshot> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return None;
        }

        let mut system = self.system.lock().ok()?;
        system.refresh_memory();

        let limit_bytes = system.total_memory();

        if limit_bytes == 0 {
            return None;
        }

        Some(MemorySnapshot {
            used_bytes: system.used_memory(),
            limit_bytes
        })
    }

    fn process_bytes(&self) -> Option<u64> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return None;
        }

        let pid = get_current_pid().ok()?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        system.process(pid).map(|process| process.memory())
    }
}

/// Probe for hosts without introspection.
pub struct UnavailableProbe;

impl MemoryProbe for UnavailableProbe {
    fn snapshot(&self) -> Option<MemorySnapshot> {
        None
    }
}
