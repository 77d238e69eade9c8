//! Error types for the render pipeline.

use crate::lifecycle::RenderPhase;

/// Boxed error produced by components, data hooks and collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced to the host by one render.
///
/// None of these are retried by the pipeline. The host answers them by
/// rendering its error page through the error path.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An app or page data-resolution phase failed.
    #[error("{phase} failed: {source}")]
    PhaseResolutionFailure {
        phase: RenderPhase,
        #[source]
        source: BoxError,
    },

    /// The component tree failed while rendering.
    #[error("render failed: {source}")]
    RenderFailure {
        #[source]
        source: BoxError,
    },

    /// The theme collaborator failed while the document was assembled.
    #[error("theme resolution failed: {source}")]
    ThemeFailure {
        #[source]
        source: BoxError,
    },
}

impl PipelineError {
    /// Phase the failure happened in.
    pub fn phase(&self) -> RenderPhase {
        match self {
            Self::PhaseResolutionFailure { phase, .. } => *phase,
            Self::RenderFailure { .. } => RenderPhase::Render,
            Self::ThemeFailure { .. } => RenderPhase::Assemble,
        }
    }

    /// Whether the failure happened before any component rendered.
    pub fn is_phase_resolution(&self) -> bool {
        matches!(self, Self::PhaseResolutionFailure { .. })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_phase_resolution_keeps_cause() {
        let err = PipelineError::PhaseResolutionFailure {
            phase: RenderPhase::PageProps,
            source: "backend unreachable".into(),
        };

        assert_eq!(err.phase(), RenderPhase::PageProps);
        assert!(err.is_phase_resolution());
        assert_eq!(err.to_string(), "PAGE_PROPS failed: backend unreachable");
        assert_eq!(err.source().unwrap().to_string(), "backend unreachable");
    }

    #[test]
    fn test_render_failure_phase() {
        let err = PipelineError::RenderFailure {
            source: "component panicked".into(),
        };

        assert_eq!(err.phase(), RenderPhase::Render);
        assert!(!err.is_phase_resolution());
    }

    #[test]
    fn test_theme_failure_phase() {
        let err = PipelineError::ThemeFailure {
            source: "palette missing".into(),
        };

        assert_eq!(err.phase(), RenderPhase::Assemble);
    }
}
