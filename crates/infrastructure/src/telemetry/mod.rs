//! Logging and tracing infrastructure
//!
//! Installs the global `tracing` subscriber with an env filter and either
//! human-readable or JSON output.

mod subscriber;

pub use subscriber::{TelemetryError, init_tracing};
