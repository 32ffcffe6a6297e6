//! Lock-protected shared state outside the pool.

pub mod counter;

pub use counter::{run_contended, Counter, Increment, RacyCounter};
