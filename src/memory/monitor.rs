use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::spawn;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::debug;

use crate::memory::advisory::to_mb;
use crate::memory::MemoryProbe;

const SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct MemoryReport {
    pub start_mb: u64,
    pub peak_mb: u64,
    pub current_mb: u64,
    pub increase_mb: i64
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MemoryUsage {
    pub used_mb: u64,
    pub total_mb: u64,
    pub percent_used: u64
}

/// Samples this process's memory on a fixed interval while a parse runs and reports the
/// peak on stop.
pub struct MemoryMonitor {
    probe: Arc<dyn MemoryProbe>,
    start_bytes: Option<u64>,
    peak_bytes: Arc<AtomicU64>,
    sampler: Option<JoinHandle<()>>
}

impl MemoryMonitor {
    pub fn new(probe: Arc<dyn MemoryProbe>) -> Self {
        Self {
            probe,
            start_bytes: None,
            peak_bytes: Arc::new(AtomicU64::new(0)),
            sampler: None
        }
    }

    /// Starts sampling. Must be called from within a tokio runtime; a no-op when the probe
    /// has no introspection capability.
    pub fn start(&mut self) {
        self.stop_sampler();

        let Some(start_bytes) = self.probe.process_bytes() else {
            debug!("Memory introspection unavailable, monitor disabled");
            return;
        };

        self.start_bytes = Some(start_bytes);
        self.peak_bytes.store(start_bytes, Ordering::Relaxed);

        let probe = self.probe.clone();
        let peak_bytes = self.peak_bytes.clone();

        self.sampler = Some(spawn(async move {
            let mut ticker = interval(SAMPLE_INTERVAL);

            loop {
                ticker.tick().await;

                if let Some(used_bytes) = probe.process_bytes() {
                    peak_bytes.fetch_max(used_bytes, Ordering::Relaxed);
                }
            }
        }));
    }

    pub fn stop(&mut self) -> MemoryReport {
        self.stop_sampler();

        let (Some(start_bytes), Some(current_bytes)) = (self.start_bytes.take(), self.probe.process_bytes()) else {
            return MemoryReport::default();
        };

        let peak_bytes = self.peak_bytes.fetch_max(current_bytes, Ordering::Relaxed).max(current_bytes);

        MemoryReport {
            start_mb: to_mb(start_bytes),
            peak_mb: to_mb(peak_bytes),
            current_mb: to_mb(current_bytes),
            increase_mb: to_mb(current_bytes) as i64 - to_mb(start_bytes) as i64
        }
    }

    /// System-wide usage at the moment of the call.
    pub fn usage(&self) -> Option<MemoryUsage> {
        self.probe.snapshot().map(|snapshot| MemoryUsage {
            used_mb: to_mb(snapshot.used_bytes),
            total_mb: to_mb(snapshot.limit_bytes),
            percent_used: snapshot.percent_used().round() as u64
        })
    }

    fn stop_sampler(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            sampler.abort();
        }
    }
}

impl Drop for MemoryMonitor {
    fn drop(&mut self) {
        self.stop_sampler();
    }
}
