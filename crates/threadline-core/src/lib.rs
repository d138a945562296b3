//! Threadline Core - Shared infrastructure for thread harvesting pipelines
//!
//! This crate provides the HTTP transport, the shared async runtime,
//! the upstream error type, and logging/progress plumbing used by
//! the source-specific pipeline crates.

pub mod error;
pub mod http;
pub mod logging;
pub mod progress;

// Re-exports for convenience
pub use error::SourceError;
pub use http::{DEFAULT_USER_AGENT, HttpConfig, HttpTransport, SHARED_RUNTIME, Transport};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, fmt_num};
