//! Three workers, ten tasks, then shutdown.
//!
//! Run with `RUST_LOG=debug cargo run --example thread_pool` to see the
//! pool's own log lines as well.

use monitor_pool::prelude::*;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .init();

    let config = Config::builder()
        .num_threads(3)
        .thread_name_prefix("Worker")
        .shutdown_policy(ShutdownPolicy::Drain)
        .build()?;
    let pool = WorkerPool::with_config(&config)?;

    for task_number in 1..=10 {
        pool.submit(move || {
            tracing::info!(task = task_number, "executing task");
            thread::sleep(Duration::from_millis(500));
        });
    }

    pool.shutdown();
    pool.join();

    let metrics = pool.metrics();
    tracing::info!(
        executed = metrics.tasks_executed,
        avg_wait_ms = metrics.avg_wait_ns / 1_000_000,
        "pool finished"
    );

    Ok(())
}
