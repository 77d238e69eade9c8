//! Render phase orchestration.

use std::time::Instant;

use concinnity_core::{
    BoxError, LifecycleObserver, NoopObserver, PipelineError, RenderPhase, RenderRequest,
    StyleConfig,
};
use concinnity_document::{AssembledDocument, DocumentAssembler, DocumentProps};
use concinnity_styles::{CacheId, CriticalCssExtractor, StyleCollectionCache, StyleError};

use crate::props::{InitialProps, InitialPropsHook, PageEntry};
use crate::render_fn::render_with_cache;

/// Runs the phase sequence for one request.
///
/// Normal path: `APP_PROPS → PAGE_PROPS → DOCUMENT_PROPS → RENDER → EXTRACT
/// → ASSEMBLE → DONE`. Error renders start at `DOCUMENT_PROPS`.
///
/// Each call to [`resolve`](Self::resolve) creates exactly one style cache,
/// at `DOCUMENT_PROPS`, and drops it once the document is assembled. The
/// orchestrator itself holds no per-request state and can be shared across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct RenderPhaseOrchestrator {
    cache_id: CacheId,
    extractor: CriticalCssExtractor,
    assembler: DocumentAssembler,
}

impl RenderPhaseOrchestrator {
    /// Create an orchestrator.
    pub fn new(styles: &StyleConfig, assembler: DocumentAssembler) -> Result<Self, StyleError> {
        Ok(Self {
            cache_id: CacheId::new(&styles.cache_key)?,
            extractor: CriticalCssExtractor::new(),
            assembler,
        })
    }

    /// Identifier given to every cache this orchestrator creates.
    pub fn cache_id(&self) -> &CacheId {
        &self.cache_id
    }

    /// The document assembler.
    pub fn assembler(&self) -> &DocumentAssembler {
        &self.assembler
    }

    /// Render a request to an assembled document.
    pub async fn resolve(
        &self,
        request: &RenderRequest,
        entry: &PageEntry<'_>,
    ) -> Result<AssembledDocument, PipelineError> {
        self.resolve_observed(request, entry, &NoopObserver).await
    }

    /// Render a request, reporting each phase to `observer`.
    ///
    /// No phase is retried. On failure no document is produced and the
    /// cache is dropped.
    pub async fn resolve_observed(
        &self,
        request: &RenderRequest,
        entry: &PageEntry<'_>,
        observer: &dyn LifecycleObserver,
    ) -> Result<AssembledDocument, PipelineError> {
        let started = Instant::now();
        let enter = |phase: RenderPhase| {
            tracing::debug!(
                request_id = %request.request_id,
                path = %request.path,
                phase = %phase,
                "entering render phase"
            );
            observer.on_phase(phase, started.elapsed());
        };
        let fail = |error: PipelineError| {
            tracing::warn!(
                request_id = %request.request_id,
                path = %request.path,
                phase = %error.phase(),
                error = %error,
                "render pipeline failed"
            );
            observer.on_failure(error.phase(), &error);
            error
        };

        let mut props = InitialProps::default();
        match &request.error {
            None => {
                enter(RenderPhase::AppProps);
                props.app = run_hook(entry.app_props, request)
                    .await
                    .map_err(|source| {
                        fail(PipelineError::PhaseResolutionFailure {
                            phase: RenderPhase::AppProps,
                            source,
                        })
                    })?;

                enter(RenderPhase::PageProps);
                props.page = run_hook(entry.page_props, request)
                    .await
                    .map_err(|source| {
                        fail(PipelineError::PhaseResolutionFailure {
                            phase: RenderPhase::PageProps,
                            source,
                        })
                    })?;
            }
            Some(error) => {
                props.page = serde_json::to_value(error).unwrap_or_default();
            }
        }

        enter(RenderPhase::DocumentProps);
        let cache = StyleCollectionCache::create(self.cache_id.clone());

        enter(RenderPhase::Render);
        let rendered = render_with_cache(entry.render, request, &props, cache)
            .map_err(|source| fail(PipelineError::RenderFailure { source }))?;

        for key in rendered.cache.conflicts() {
            tracing::warn!(
                request_id = %request.request_id,
                path = %request.path,
                key = %key,
                "style rule recorded with conflicting text"
            );
            observer.on_style_conflict(key.as_str());
        }

        enter(RenderPhase::Extract);
        let snapshot = rendered.cache.into_snapshot();
        let fragments = self.extractor.extract(&rendered.html, &snapshot);
        let emitted: usize = fragments.iter().map(|fragment| fragment.keys.len()).sum();
        tracing::debug!(
            request_id = %request.request_id,
            registered = snapshot.len(),
            emitted,
            fragments = fragments.len(),
            "critical styles extracted"
        );
        observer.on_styles(snapshot.len(), emitted, fragments.len());

        enter(RenderPhase::Assemble);
        let base = DocumentProps {
            html: rendered.html,
            head: rendered.head,
            styles: rendered.styles,
            data: if props.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::to_value(&props).unwrap_or_default()
            },
        };
        let document = self.assembler.assemble(base, &fragments).map_err(|e| {
            fail(PipelineError::ThemeFailure {
                source: Box::new(e),
            })
        })?;

        enter(RenderPhase::Done);
        Ok(document)
    }
}

async fn run_hook(
    hook: Option<&dyn InitialPropsHook>,
    request: &RenderRequest,
) -> Result<serde_json::Value, BoxError> {
    match hook {
        Some(hook) => hook.initial_props(request).await,
        None => Ok(serde_json::Value::Null),
    }
}
