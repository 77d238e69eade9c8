//! Render timing and style metrics.

use std::sync::Mutex;
use std::time::Duration;

use concinnity_core::{LifecycleObserver, PipelineError, RenderPhase, RequestId};
use serde::{Deserialize, Serialize};

/// Offset of one phase from the start of the render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub phase: RenderPhase,
    /// Microseconds from render start to phase entry.
    pub at_us: u64,
}

/// Metrics for a single render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderMetrics {
    /// Request ID for correlation.
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Phases entered, in order.
    pub phases: Vec<PhaseTiming>,
    /// Phase that failed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_phase: Option<RenderPhase>,
    /// Rules the component tree registered.
    pub rules_registered: usize,
    /// Rules kept by extraction.
    pub rules_emitted: usize,
    /// Style fragments emitted.
    pub fragments: usize,
    /// Rule keys recorded again with different text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_conflicts: Vec<String>,
    /// Offset of the last phase entered (microseconds).
    pub total_duration_us: u64,
    /// HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl RenderMetrics {
    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as a human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Render {} {}",
            self.request_id,
            self.route.as_deref().unwrap_or("-")
        ));
        for timing in &self.phases {
            lines.push(format!(
                "  {}: {}us ({:.2}ms)",
                timing.phase,
                timing.at_us,
                timing.at_us as f64 / 1000.0
            ));
        }
        lines.push(format!(
            "  Styles: {}/{} rules in {} fragment(s)",
            self.rules_emitted, self.rules_registered, self.fragments
        ));
        if !self.style_conflicts.is_empty() {
            lines.push(format!("  Conflicts: {}", self.style_conflicts.join(", ")));
        }
        if let Some(phase) = self.failed_phase {
            lines.push(format!("  Failed at {}", phase));
        }
        if let Some(status) = self.status_code {
            lines.push(format!("  Status: {}", status));
        }

        lines.join("\n")
    }
}

#[derive(Debug, Default)]
struct Recorded {
    phases: Vec<PhaseTiming>,
    failed_phase: Option<RenderPhase>,
    rules_registered: usize,
    rules_emitted: usize,
    fragments: usize,
    style_conflicts: Vec<String>,
}

/// Lifecycle observer that collects [`RenderMetrics`] for one render.
#[derive(Debug)]
pub struct MetricsCollector {
    request_id: RequestId,
    route: Option<String>,
    recorded: Mutex<Recorded>,
}

impl MetricsCollector {
    /// Create a collector for one request.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            route: None,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Set the route path.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Finalize with the response status.
    pub fn finalize(self, status_code: Option<u16>) -> RenderMetrics {
        let recorded = self.recorded.into_inner().unwrap_or_default();
        let total_duration_us = recorded.phases.last().map(|t| t.at_us).unwrap_or(0);

        RenderMetrics {
            request_id: self.request_id.to_string(),
            route: self.route,
            phases: recorded.phases,
            failed_phase: recorded.failed_phase,
            rules_registered: recorded.rules_registered,
            rules_emitted: recorded.rules_emitted,
            fragments: recorded.fragments,
            style_conflicts: recorded.style_conflicts,
            total_duration_us,
            status_code,
        }
    }
}

impl LifecycleObserver for MetricsCollector {
    fn on_phase(&self, phase: RenderPhase, elapsed: Duration) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.phases.push(PhaseTiming {
                phase,
                at_us: elapsed.as_micros() as u64,
            });
        }
    }

    fn on_styles(&self, registered: usize, emitted: usize, fragments: usize) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.rules_registered = registered;
            recorded.rules_emitted = emitted;
            recorded.fragments = fragments;
        }
    }

    fn on_style_conflict(&self, key: &str) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.style_conflicts.push(key.to_string());
        }
    }

    fn on_failure(&self, phase: RenderPhase, _error: &PipelineError) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.failed_phase = Some(phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector() -> MetricsCollector {
        MetricsCollector::new(RequestId::from_string("req-7")).with_route("/")
    }

    #[test]
    fn test_collects_phases_and_styles() {
        let collector = collector();
        collector.on_phase(RenderPhase::DocumentProps, Duration::from_micros(5));
        collector.on_phase(RenderPhase::Render, Duration::from_micros(40));
        collector.on_styles(4, 2, 1);
        collector.on_phase(RenderPhase::Done, Duration::from_micros(90));

        let metrics = collector.finalize(Some(200));

        assert_eq!(metrics.phases.len(), 3);
        assert_eq!(metrics.phases[1].phase, RenderPhase::Render);
        assert_eq!(metrics.total_duration_us, 90);
        assert_eq!((metrics.rules_registered, metrics.rules_emitted), (4, 2));
        assert_eq!(metrics.fragments, 1);
        assert_eq!(metrics.status_code, Some(200));
        assert_eq!(metrics.failed_phase, None);
    }

    #[test]
    fn test_records_failure() {
        let collector = collector();
        collector.on_phase(RenderPhase::AppProps, Duration::ZERO);
        let error = PipelineError::PhaseResolutionFailure {
            phase: RenderPhase::AppProps,
            source: "down".into(),
        };
        collector.on_failure(error.phase(), &error);

        let metrics = collector.finalize(Some(500));

        assert_eq!(metrics.failed_phase, Some(RenderPhase::AppProps));
        assert!(metrics.to_summary().contains("Failed at APP_PROPS"));
    }

    #[test]
    fn test_records_style_conflicts() {
        let collector = collector();
        collector.on_style_conflict("x");

        let metrics = collector.finalize(Some(200));

        assert_eq!(metrics.style_conflicts, vec!["x".to_string()]);
        assert!(metrics.to_summary().contains("Conflicts: x"));
    }

    #[test]
    fn test_json_shape() {
        let collector = collector();
        collector.on_phase(RenderPhase::Done, Duration::from_micros(1));

        let value: serde_json::Value =
            serde_json::from_str(&collector.finalize(None).to_json()).unwrap();

        assert_eq!(value["request_id"], "req-7");
        assert_eq!(value["phases"][0]["phase"], "DONE");
        assert!(value.get("status_code").is_none());
        assert!(value.get("failed_phase").is_none());
        assert!(value.get("style_conflicts").is_none());
    }
}
