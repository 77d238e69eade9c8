//! Observability for the Concinnity frontend.
//!
//! This crate provides:
//! - `StructuredLogger` - Request-scoped structured log lines
//! - `MetricsCollector` - Lifecycle observer producing `RenderMetrics`

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;

// Re-export RequestId from concinnity-core for convenience
pub use concinnity_core::RequestId;
