//! A fixed-size worker pool driven by one lock and one condition variable.
//!
//! Callers hand opaque tasks to [`WorkerPool::submit`]; tasks are queued in
//! FIFO order and each is run exactly once by whichever idle worker wakes for
//! it. Workers park in a guarded wait on the pool's condition variable and
//! run tasks outside the lock.
//!
//! # Quick Start
//!
//! ```
//! use monitor_pool::prelude::*;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let config = Config::builder()
//!     .num_threads(3)
//!     .shutdown_policy(ShutdownPolicy::Drain)
//!     .build()
//!     .unwrap();
//! let pool = WorkerPool::with_config(&config).unwrap();
//!
//! let done = Arc::new(AtomicUsize::new(0));
//! for _ in 0..10 {
//!     let done = done.clone();
//!     pool.submit(move || {
//!         done.fetch_add(1, Ordering::SeqCst);
//!     });
//! }
//!
//! pool.shutdown();
//! pool.join();
//! assert_eq!(done.load(Ordering::SeqCst), 10);
//! ```
//!
//! # Shutdown
//!
//! [`WorkerPool::shutdown`] flips the run flag and wakes every worker. By
//! default ([`ShutdownPolicy::Abandon`]) tasks still queued are discarded;
//! [`ShutdownPolicy::Drain`] runs them first. Submits after shutdown are
//! silently dropped.
//!
//! # Task panics
//!
//! With the default [`PanicStrategy::Propagate`] a panicking task takes its
//! worker thread down with it and the pool keeps running one worker short.
//! [`PanicStrategy::LogAndContinue`] keeps the worker alive.

// Lint configuration
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod sync;
pub mod telemetry;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder, ShutdownPolicy};
pub use error::{Error, Result};
pub use executor::{PanicStrategy, Task, WorkerPool};
pub use telemetry::MetricsSnapshot;
