//! Render phase orchestration for server-rendered pages.
//!
//! This crate ties the style pipeline together:
//! - `RenderFn` / `RenderContext` - Capability-bounded page render functions
//! - `WithStyleCache` - Middleware injecting the request's style cache
//! - `InitialPropsHook` - Async app and page data resolution
//! - `RenderPhaseOrchestrator` - Runs the phase sequence for one request

mod orchestrator;
mod props;
mod render_fn;

pub use orchestrator::*;
pub use props::*;
pub use render_fn::*;
