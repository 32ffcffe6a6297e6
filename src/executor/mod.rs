//! Task execution infrastructure.
//!
//! This module provides the task and queue types, the worker loop, and the
//! fixed-size worker pool that ties them to a single lock and condition.

pub mod panic_handler;
pub mod pool;
pub mod queue;
pub mod task;
pub mod worker;

pub use panic_handler::{PanicHandler, PanicInfo, PanicStrategy};
pub use pool::WorkerPool;
pub use queue::TaskQueue;
pub use task::{Task, TaskId};
pub use worker::{WorkerId, WorkerStatsSnapshot};
