use monitor_pool::prelude::*;
use monitor_pool::sync::{run_contended, RacyCounter};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const WAIT: Duration = Duration::from_secs(10);

fn drain_pool(threads: usize) -> WorkerPool {
    let config = Config::builder()
        .num_threads(threads)
        .shutdown_policy(ShutdownPolicy::Drain)
        .build()
        .unwrap();
    WorkerPool::with_config(&config).unwrap()
}

fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}

#[test]
fn test_invalid_size() {
    assert!(matches!(
        WorkerPool::new(0),
        Err(Error::InvalidConfiguration(_))
    ));
}

#[test]
fn test_fifo_dequeue_order_single_worker() {
    let pool = drain_pool(1);
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..50 {
        let order = order.clone();
        pool.submit(move || order.lock().push(i));
    }

    pool.shutdown();
    pool.join();

    let order = order.lock();
    assert_eq!(*order, (0..50).collect::<Vec<_>>());
}

#[test]
fn test_no_lost_tasks() {
    let pool = drain_pool(3);
    let seen = Arc::new(Mutex::new(Vec::new()));

    for i in 0..10 {
        let seen = seen.clone();
        pool.submit(move || {
            thread::sleep(Duration::from_millis(5));
            seen.lock().push(i);
        });
    }

    pool.shutdown();
    assert_eq!(pool.join(), 0);

    let mut seen = seen.lock().clone();
    assert_eq!(seen.len(), 10);
    seen.sort();
    assert_eq!(seen, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_no_lost_tasks_abandon_after_completion() {
    let pool = WorkerPool::new(3).unwrap();
    let done = Arc::new(AtomicUsize::new(0));

    for _ in 0..10 {
        let done = done.clone();
        pool.submit(move || {
            done.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert!(wait_for(|| done.load(Ordering::SeqCst) == 10));
    pool.shutdown();
    pool.join();

    assert_eq!(done.load(Ordering::SeqCst), 10);
    assert_eq!(pool.metrics().tasks_abandoned, 0);
}

#[test]
fn test_each_task_runs_once() {
    let pool = drain_pool(4);
    let runs: Arc<Vec<AtomicUsize>> = Arc::new((0..200).map(|_| AtomicUsize::new(0)).collect());

    for i in 0..200 {
        let runs = runs.clone();
        pool.submit(move || {
            runs[i].fetch_add(1, Ordering::SeqCst);
        });
    }

    pool.shutdown();
    pool.join();

    assert!(runs.iter().all(|r| r.load(Ordering::SeqCst) == 1));
}

#[test]
fn test_concurrent_submitters() {
    let pool = Arc::new(drain_pool(3));
    let seen = Arc::new(Mutex::new(HashSet::new()));

    thread::scope(|s| {
        for caller in 0..4 {
            let pool = pool.clone();
            let seen = seen.clone();
            s.spawn(move || {
                for i in 0..25 {
                    let seen = seen.clone();
                    pool.submit(move || {
                        seen.lock().insert((caller, i));
                    });
                }
            });
        }
    });

    pool.shutdown();
    pool.join();

    assert_eq!(seen.lock().len(), 100);
    assert_eq!(pool.metrics().tasks_submitted, 100);
}

#[test]
fn test_shutdown_terminates_idle_workers() {
    let pool = WorkerPool::new(3).unwrap();
    assert_eq!(pool.live_workers(), 3);

    pool.shutdown();

    assert!(pool.await_termination(WAIT));
    assert_eq!(pool.live_workers(), 0);
}

#[test]
fn test_shutdown_lets_running_task_finish() {
    let pool = WorkerPool::new(1).unwrap();
    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));

    {
        let started = started.clone();
        let finished = finished.clone();
        pool.submit(move || {
            started.store(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
            finished.store(1, Ordering::SeqCst);
        });
    }

    assert!(wait_for(|| started.load(Ordering::SeqCst) == 1));
    pool.shutdown();
    pool.join();

    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

#[test]
fn test_submit_after_shutdown_never_runs() {
    let pool = WorkerPool::new(2).unwrap();
    pool.shutdown();
    pool.join();

    let ran = Arc::new(AtomicUsize::new(0));
    for _ in 0..5 {
        let ran = ran.clone();
        pool.submit(move || {
            ran.fetch_add(1, Ordering::SeqCst);
        });
    }

    thread::sleep(Duration::from_millis(20));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(pool.metrics().tasks_dropped, 5);
}

#[test]
fn test_task_panic_is_local_to_worker() {
    let config = Config::builder()
        .num_threads(2)
        .panic_strategy(PanicStrategy::LogAndContinue)
        .shutdown_policy(ShutdownPolicy::Drain)
        .build()
        .unwrap();
    let pool = WorkerPool::with_config(&config).unwrap();
    let done = Arc::new(AtomicUsize::new(0));

    for i in 0..10 {
        let done = done.clone();
        pool.submit(move || {
            if i % 3 == 0 {
                panic!("task {} failed", i);
            }
            done.fetch_add(1, Ordering::SeqCst);
        });
    }

    pool.shutdown();
    assert_eq!(pool.join(), 0);

    assert_eq!(done.load(Ordering::SeqCst), 6);
    let metrics = pool.metrics();
    assert_eq!(metrics.tasks_panicked, 4);
    assert_eq!(metrics.tasks_executed, 6);
}

#[test]
fn test_counter_exactness() {
    for _ in 0..20 {
        let counter = Counter::new();
        assert_eq!(run_contended(&counter, 3, 1000), 3000);
    }
}

#[test]
fn test_racy_counter_bounded() {
    let counter = RacyCounter::new();
    assert!(run_contended(&counter, 3, 1000) <= 3000);
}
