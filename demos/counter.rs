//! Three threads share one lock-protected counter.

use monitor_pool::sync::{run_contended, Counter, RacyCounter};

fn main() {
    let counter = Counter::new();
    let value = run_contended(&counter, 3, 1000);
    println!("Final Counter Value: {}", value);

    let racy = RacyCounter::new();
    let value = run_contended(&racy, 3, 1000);
    println!("Without the lock: {} (expected 3000)", value);
}
