//! A scalar shared between threads, guarded by one exclusive lock.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

pub trait Increment {
    fn increment(&self);
    fn get(&self) -> u64;
}

/// Counter whose every update happens under a single mutex.
#[derive(Debug, Default)]
pub struct Counter {
    count: Mutex<u64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Increment for Counter {
    fn increment(&self) {
        *self.count.lock() += 1;
    }

    fn get(&self) -> u64 {
        *self.count.lock()
    }
}

/// Counter that reads and writes in two separate steps with no lock around
/// them. Concurrent increments can overwrite each other.
#[derive(Debug, Default)]
pub struct RacyCounter {
    count: AtomicU64,
}

impl RacyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read, run `pause`, then write back the read value plus one.
    pub fn increment_with_pause<F: FnOnce()>(&self, pause: F) {
        let seen = self.count.load(Ordering::Relaxed);
        pause();
        self.count.store(seen + 1, Ordering::Relaxed);
    }
}

impl Increment for RacyCounter {
    fn increment(&self) {
        self.increment_with_pause(thread::yield_now);
    }

    fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Spawn `threads` scoped threads that each call `increment` `per_thread`
/// times, wait for all of them, and return the final value.
pub fn run_contended<C>(counter: &C, threads: usize, per_thread: usize) -> u64
where
    C: Increment + Sync,
{
    thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..per_thread {
                    counter.increment();
                }
            });
        }
    });

    counter.get()
}
