//! Render lifecycle phases and observation.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::RenderRequest;
use crate::error::PipelineError;

/// Phases of one server render, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderPhase {
    /// App-level initial data resolution.
    AppProps,
    /// Page-level initial data resolution.
    PageProps,
    /// Document-level setup; the style cache is created here.
    DocumentProps,
    /// Component tree rendered to markup.
    Render,
    /// Critical styles extracted from the cache.
    Extract,
    /// Styles merged into the outgoing document.
    Assemble,
    /// Document ready for the transport.
    Done,
}

/// Phase sequence for a normal render.
pub const NORMAL_PHASES: &[RenderPhase] = &[
    RenderPhase::AppProps,
    RenderPhase::PageProps,
    RenderPhase::DocumentProps,
    RenderPhase::Render,
    RenderPhase::Extract,
    RenderPhase::Assemble,
    RenderPhase::Done,
];

/// Phase sequence for an error-page render. App and page data are skipped.
pub const ERROR_PHASES: &[RenderPhase] = &[
    RenderPhase::DocumentProps,
    RenderPhase::Render,
    RenderPhase::Extract,
    RenderPhase::Assemble,
    RenderPhase::Done,
];

impl RenderPhase {
    /// The phase sequence a request runs through.
    pub fn plan_for(request: &RenderRequest) -> &'static [RenderPhase] {
        if request.is_error_render() {
            ERROR_PHASES
        } else {
            NORMAL_PHASES
        }
    }

    /// Whether components may render during this phase.
    pub fn renders_components(&self) -> bool {
        matches!(self, Self::Render)
    }

    /// Stable uppercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AppProps => "APP_PROPS",
            Self::PageProps => "PAGE_PROPS",
            Self::DocumentProps => "DOCUMENT_PROPS",
            Self::Render => "RENDER",
            Self::Extract => "EXTRACT",
            Self::Assemble => "ASSEMBLE",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observer trait for lifecycle events.
///
/// Observers are request-scoped; the orchestrator calls them synchronously
/// and in phase order.
pub trait LifecycleObserver: Send + Sync {
    /// Called when a phase is entered. `elapsed` is measured from the start
    /// of the render.
    fn on_phase(&self, phase: RenderPhase, elapsed: Duration);

    /// Called after extraction with the number of rules the tree registered,
    /// the number kept and the number of fragments produced.
    fn on_styles(&self, _registered: usize, _emitted: usize, _fragments: usize) {}

    /// Called after rendering for each rule key that was recorded again
    /// with different text. The first text was kept.
    fn on_style_conflict(&self, _key: &str) {}

    /// Called when a phase fails. No further phases follow.
    fn on_failure(&self, _phase: RenderPhase, _error: &PipelineError) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LifecycleObserver for NoopObserver {
    fn on_phase(&self, _phase: RenderPhase, _elapsed: Duration) {}
}

/// Observer that records the phase trace of one render.
#[derive(Debug, Default)]
pub struct PhaseRecorder {
    phases: Mutex<Vec<RenderPhase>>,
    failed_at: Mutex<Option<RenderPhase>>,
    conflicts: Mutex<Vec<String>>,
}

impl PhaseRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Phases entered so far, in order.
    pub fn trace(&self) -> Vec<RenderPhase> {
        self.phases
            .lock()
            .map(|phases| phases.clone())
            .unwrap_or_default()
    }

    /// Phase that failed, if any.
    pub fn failed_at(&self) -> Option<RenderPhase> {
        self.failed_at.lock().ok().and_then(|failed| *failed)
    }

    /// Conflicting rule keys reported so far.
    pub fn conflicts(&self) -> Vec<String> {
        self.conflicts
            .lock()
            .map(|conflicts| conflicts.clone())
            .unwrap_or_default()
    }
}

impl LifecycleObserver for PhaseRecorder {
    fn on_phase(&self, phase: RenderPhase, _elapsed: Duration) {
        if let Ok(mut phases) = self.phases.lock() {
            phases.push(phase);
        }
    }

    fn on_style_conflict(&self, key: &str) {
        if let Ok(mut conflicts) = self.conflicts.lock() {
            conflicts.push(key.to_string());
        }
    }

    fn on_failure(&self, phase: RenderPhase, _error: &PipelineError) {
        if let Ok(mut failed) = self.failed_at.lock() {
            *failed = Some(phase);
        }
    }
}
