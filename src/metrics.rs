use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Performance metrics for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub scans_completed: Arc<AtomicUsize>,
    pub files_processed: Arc<AtomicU64>,
    pub bytes_scanned: Arc<AtomicU64>,
    pub streams_served: Arc<AtomicUsize>,
    pub bytes_streamed: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            scans_completed: Arc::new(AtomicUsize::new(0)),
            files_processed: Arc::new(AtomicU64::new(0)),
            bytes_scanned: Arc::new(AtomicU64::new(0)),
            streams_served: Arc::new(AtomicUsize::new(0)),
            bytes_streamed: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn record_scan(&self, files: u64, bytes: u64) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        self.files_processed.fetch_add(files, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_stream(&self, bytes: u64) {
        self.streams_served.fetch_add(1, Ordering::Relaxed);
        self.bytes_streamed.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            scans_completed: self.scans_completed.load(Ordering::Relaxed),
            files_processed: self.files_processed.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            streams_served: self.streams_served.load(Ordering::Relaxed),
            bytes_streamed: self.bytes_streamed.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub scans_completed: usize,
    pub files_processed: u64,
    pub bytes_scanned: u64,
    pub streams_served: usize,
    pub bytes_streamed: u64,
    pub uptime_seconds: u64,
}
