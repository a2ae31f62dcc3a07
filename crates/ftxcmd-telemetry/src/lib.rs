//! Prometheus counters and structured logging for ftxcmd.
//!
//! - Session counters for submitted orders, guard rejections, command errors and
//!   exchange latency, read back by the interpreter's `stats` command
//! - Structured logging with tracing, kept off stdout so it never interleaves
//!   with REPL output

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::{Metrics, MetricsSnapshot};
