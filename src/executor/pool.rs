use super::panic_handler::PanicHandler;
use super::queue::TaskQueue;
use super::task::Task;
use super::worker::{Worker, WorkerId, WorkerStats, WorkerStatsSnapshot};
use crate::config::{Config, ShutdownPolicy};
use crate::error::{Error, Result};
use crate::telemetry::{Metrics, MetricsSnapshot};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Everything guarded by the pool's single lock.
#[derive(Debug)]
pub(crate) struct State {
    pub queue: TaskQueue,
    pub running: bool,
}

#[derive(Debug)]
pub(crate) struct Shared {
    pub state: Mutex<State>,
    /// Signalled once per enqueued task, and broadcast on shutdown.
    pub available: Condvar,
    pub live_workers: Mutex<usize>,
    pub terminated: Condvar,
    pub shutdown_policy: ShutdownPolicy,
    pub panic_handler: PanicHandler,
    pub metrics: Metrics,
}

impl Shared {
    pub(crate) fn new(shutdown_policy: ShutdownPolicy, panic_handler: PanicHandler) -> Self {
        Self {
            state: Mutex::new(State {
                queue: TaskQueue::new(),
                running: true,
            }),
            available: Condvar::new(),
            live_workers: Mutex::new(0),
            terminated: Condvar::new(),
            shutdown_policy,
            panic_handler,
            metrics: Metrics::new(),
        }
    }
}

/// A fixed-size pool of worker threads fed from one FIFO queue.
///
/// Submission is fire-and-forget: tasks return nothing and a submit after
/// [`shutdown`](WorkerPool::shutdown) is silently dropped.
///
/// ```
/// use monitor_pool::WorkerPool;
///
/// let pool = WorkerPool::new(3).unwrap();
/// pool.submit(|| println!("hello from the pool"));
/// pool.shutdown();
/// pool.join();
/// ```
#[derive(Debug)]
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<WorkerHandle>>,
    size: usize,
}

#[derive(Debug)]
struct WorkerHandle {
    id: WorkerId,
    name: String,
    stats: Arc<WorkerStats>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start a pool of `size` workers with default settings otherwise.
    pub fn new(size: usize) -> Result<Self> {
        let config = Config::builder().num_threads(size).build()?;
        Self::with_config(&config)
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let num_threads = config.worker_threads();

        let shared = Arc::new(Shared::new(
            config.shutdown_policy,
            PanicHandler::new(config.panic_strategy),
        ));

        let mut handles = Vec::with_capacity(num_threads);

        for id in 0..num_threads {
            let worker = Worker::new(id);
            let stats = worker.stats.clone();
            let name = format!("{}-{}", config.thread_name_prefix, id);
            let shared_clone = shared.clone();

            let mut builder = thread::Builder::new().name(name.clone());
            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            *shared.live_workers.lock() += 1;

            match builder.spawn(move || worker.run(&shared_clone)) {
                Ok(thread) => handles.push(WorkerHandle {
                    id,
                    name,
                    stats,
                    thread: Some(thread),
                }),
                Err(e) => {
                    *shared.live_workers.lock() -= 1;
                    tracing::error!(worker = id, error = %e, "failed to spawn worker");

                    // Dropping the partial pool stops and joins what did start.
                    drop(Self {
                        shared,
                        workers: Mutex::new(handles),
                        size: num_threads,
                    });
                    return Err(Error::Spawn(e));
                }
            }
        }

        tracing::debug!(workers = num_threads, "worker pool started");

        Ok(Self {
            shared,
            workers: Mutex::new(handles),
            size: num_threads,
        })
    }

    pub fn submit<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_task(Task::new(f));
    }

    /// Enqueue `task` and wake one waiting worker.
    ///
    /// Never blocks beyond the lock hold. After shutdown the task is dropped
    /// without running and without an error.
    pub fn submit_task(&self, task: Task) {
        let mut state = self.shared.state.lock();

        if !state.running {
            drop(state);
            self.shared.metrics.record_dropped();
            tracing::debug!(task = task.id().as_u64(), "pool shut down, task dropped");
            return;
        }

        state.queue.push(task);
        self.shared.available.notify_one();
        drop(state);

        self.shared.metrics.record_submitted();
    }

    /// Stop the pool. Returns without waiting for workers to exit.
    ///
    /// Every worker is woken so that idle ones observe the stop at once. Tasks
    /// already running finish. What happens to tasks still queued depends on
    /// the [`ShutdownPolicy`]. Calling this more than once is harmless.
    pub fn shutdown(&self) {
        let (was_running, abandoned) = {
            let mut state = self.shared.state.lock();
            let was_running = std::mem::replace(&mut state.running, false);
            let abandoned = match self.shared.shutdown_policy {
                ShutdownPolicy::Abandon => state.queue.take_all(),
                ShutdownPolicy::Drain => Default::default(),
            };
            (was_running, abandoned)
        };

        self.shared.available.notify_all();

        if was_running {
            tracing::debug!(policy = ?self.shared.shutdown_policy, "worker pool shutting down");
        }

        if !abandoned.is_empty() {
            self.shared.metrics.record_abandoned(abandoned.len());
            tracing::debug!(count = abandoned.len(), "abandoned queued tasks on shutdown");
        }
    }

    /// Block until every worker thread has exited.
    ///
    /// Call [`shutdown`](WorkerPool::shutdown) first; on a running pool this
    /// waits for as long as the pool runs. Returns how many workers ended by
    /// panic. A worker calling this on its own pool skips joining itself.
    pub fn join(&self) -> usize {
        let handles: Vec<JoinHandle<()>> = {
            let mut workers = self.workers.lock();
            workers.iter_mut().filter_map(|w| w.thread.take()).collect()
        };

        let current = thread::current().id();
        let mut panicked = 0;

        for handle in handles {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                panicked += 1;
            }
        }

        panicked
    }

    /// Wait up to `timeout` for every worker to exit. Returns `true` if they
    /// all did. A timeout too large to form a deadline waits without one.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        let mut live = self.shared.live_workers.lock();

        let Some(deadline) = Instant::now().checked_add(timeout) else {
            while *live > 0 {
                self.shared.terminated.wait(&mut live);
            }
            return true;
        };

        while *live > 0 {
            if self
                .shared
                .terminated
                .wait_until(&mut live, deadline)
                .timed_out()
            {
                return *live == 0;
            }
        }

        true
    }

    /// Worker count fixed at construction.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Workers whose thread has not exited yet.
    pub fn live_workers(&self) -> usize {
        *self.shared.live_workers.lock()
    }

    pub fn pending_tasks(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    pub fn is_running(&self) -> bool {
        self.shared.state.lock().running
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        let mut snapshot = self.shared.metrics.snapshot();
        snapshot.tasks_panicked = self.shared.panic_handler.panic_count() as u64;
        snapshot
    }

    pub fn worker_stats(&self) -> Vec<WorkerStatsSnapshot> {
        self.workers
            .lock()
            .iter()
            .map(|w| WorkerStatsSnapshot {
                id: w.id,
                name: w.name.clone(),
                tasks_executed: w.stats.tasks_executed.load(Ordering::Relaxed),
                tasks_panicked: w.stats.tasks_panicked.load(Ordering::Relaxed),
            })
            .collect()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
        self.join();
    }
}
