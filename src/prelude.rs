pub use crate::config::{Config, ConfigBuilder, ShutdownPolicy};
pub use crate::error::{Error, Result};
pub use crate::executor::{PanicStrategy, Task, WorkerPool};
pub use crate::sync::{Counter, Increment};
pub use crate::telemetry::MetricsSnapshot;
