// worker thread loop
use super::pool::Shared;
use super::task::Task;
use crate::config::ShutdownPolicy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

pub type WorkerId = usize;

// stats for each worker
#[derive(Debug)]
pub struct WorkerStats {
    pub tasks_executed: AtomicU64,
    pub tasks_panicked: AtomicU64,
}

impl WorkerStats {
    fn new() -> Self {
        Self {
            tasks_executed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
        }
    }
}

/// Point-in-time view of one worker's counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStatsSnapshot {
    pub id: WorkerId,
    pub name: String,
    pub tasks_executed: u64,
    pub tasks_panicked: u64,
}

#[derive(Debug)]
pub(crate) struct Worker {
    pub id: WorkerId,
    pub stats: Arc<WorkerStats>,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            stats: Arc::new(WorkerStats::new()),
        }
    }

    // main loop
    pub fn run(&self, shared: &Shared) {
        let _alive = LivenessGuard::new(shared, self.id, &self.stats);

        while let Some(task) = self.next_task(shared) {
            self.execute_task(shared, task);
        }
    }

    /// Guarded wait: block until a task is available or the pool stops.
    ///
    /// The run flag and the queue are re-checked under the lock after every
    /// wake, so spurious wakeups and wakeups after shutdown are harmless.
    fn next_task(&self, shared: &Shared) -> Option<Task> {
        let mut state = shared.state.lock();

        loop {
            if !state.running {
                let stop = match shared.shutdown_policy {
                    ShutdownPolicy::Abandon => true,
                    ShutdownPolicy::Drain => state.queue.is_empty(),
                };
                if stop {
                    return None;
                }
            }

            if let Some(task) = state.queue.pop() {
                return Some(task);
            }

            shared.available.wait(&mut state);
        }
    }

    /// Runs the task with the pool lock released.
    fn execute_task(&self, shared: &Shared, task: Task) {
        let tid = task.id();
        shared
            .metrics
            .record_dequeue(task.created_at().elapsed().as_nanos() as u64);
        tracing::trace!(worker = self.id, task = tid.as_u64(), "dispatching task");

        let start = Instant::now();
        let result = shared.panic_handler.execute(|| task.run());
        let duration_ns = start.elapsed().as_nanos() as u64;

        match result {
            Ok(()) => {
                shared.metrics.record_task_execution(duration_ns);
                self.stats.tasks_executed.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.stats.tasks_panicked.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Keeps the pool's live-worker count honest, including when the worker
/// thread unwinds out of a panicking task.
struct LivenessGuard<'a> {
    shared: &'a Shared,
    id: WorkerId,
    stats: &'a WorkerStats,
}

impl<'a> LivenessGuard<'a> {
    fn new(shared: &'a Shared, id: WorkerId, stats: &'a WorkerStats) -> Self {
        tracing::debug!(worker = id, "worker started");
        Self { shared, id, stats }
    }
}

impl Drop for LivenessGuard<'_> {
    fn drop(&mut self) {
        // Only task code can unwind through the loop.
        if thread::panicking() {
            self.stats.tasks_panicked.fetch_add(1, Ordering::Relaxed);
            self.shared.metrics.record_worker_lost();
            tracing::warn!(worker = self.id, "worker lost to task panic");
        } else {
            tracing::debug!(worker = self.id, "worker stopped");
        }

        let mut live = self.shared.live_workers.lock();
        *live = live.saturating_sub(1);
        self.shared.terminated.notify_all();
    }
}
