//! Core abstractions for the Concinnity server-render pipeline.
//!
//! This crate provides the fundamental types shared by every stage:
//! - `RenderRequest` - One inbound page render with its request context
//! - `RenderPhase` - The fixed server-render lifecycle
//! - `LifecycleObserver` - Phase tracking hooks
//! - `ShellConfig` - Document, style and theme configuration
//! - `PipelineError` - Failure taxonomy surfaced to the host

mod config;
mod context;
mod error;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use error::*;
pub use lifecycle::*;
