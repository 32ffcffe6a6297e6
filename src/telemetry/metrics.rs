//! Metrics collection for pool monitoring.

use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Pool metrics collector
#[derive(Debug)]
pub struct Metrics {
    // Task counters
    tasks_submitted: AtomicU64,
    tasks_dropped: AtomicU64,
    tasks_executed: AtomicU64,
    tasks_abandoned: AtomicU64,

    workers_lost: AtomicU64,
    busy_time_ns: AtomicU64,

    // Enqueue-to-dequeue wait, in nanoseconds
    queue_wait: RwLock<Histogram<u64>>,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        // 3 significant figures, max value of 1 hour in nanoseconds
        let histogram =
            Histogram::new_with_max(3_600_000_000_000, 3).expect("Failed to create histogram");

        Self {
            tasks_submitted: AtomicU64::new(0),
            tasks_dropped: AtomicU64::new(0),
            tasks_executed: AtomicU64::new(0),
            tasks_abandoned: AtomicU64::new(0),
            workers_lost: AtomicU64::new(0),
            busy_time_ns: AtomicU64::new(0),
            queue_wait: RwLock::new(histogram),
            start_time: Instant::now(),
        }
    }

    pub fn record_submitted(&self) {
        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// A submit that arrived after shutdown.
    pub fn record_dropped(&self) {
        self.tasks_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_abandoned(&self, count: usize) {
        self.tasks_abandoned
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Waits longer than the histogram's range are clamped to its maximum.
    pub fn record_dequeue(&self, wait_ns: u64) {
        self.queue_wait.write().saturating_record(wait_ns);
    }

    pub fn record_task_execution(&self, duration_ns: u64) {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed);
        self.busy_time_ns.fetch_add(duration_ns, Ordering::Relaxed);
    }

    pub fn record_worker_lost(&self) {
        self.workers_lost.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let histogram = self.queue_wait.read();

        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            tasks_submitted: self.tasks_submitted.load(Ordering::Relaxed),
            tasks_dropped: self.tasks_dropped.load(Ordering::Relaxed),
            tasks_executed: self.tasks_executed.load(Ordering::Relaxed),
            tasks_abandoned: self.tasks_abandoned.load(Ordering::Relaxed),
            tasks_panicked: 0,
            workers_lost: self.workers_lost.load(Ordering::Relaxed),
            busy_time_ns: self.busy_time_ns.load(Ordering::Relaxed),
            avg_wait_ns: if histogram.len() > 0 {
                histogram.mean() as u64
            } else {
                0
            },
            p50_wait_ns: histogram.value_at_quantile(0.50),
            p99_wait_ns: histogram.value_at_quantile(0.99),
            max_wait_ns: histogram.max(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub uptime: Duration,
    pub tasks_submitted: u64,
    pub tasks_dropped: u64,
    pub tasks_executed: u64,
    pub tasks_abandoned: u64,
    pub tasks_panicked: u64,
    pub workers_lost: u64,
    pub busy_time_ns: u64,
    pub avg_wait_ns: u64,
    pub p50_wait_ns: u64,
    pub p99_wait_ns: u64,
    pub max_wait_ns: u64,
}

impl MetricsSnapshot {
    pub fn tasks_per_second(&self) -> f64 {
        let seconds = self.uptime.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.tasks_executed as f64 / seconds
    }
}
