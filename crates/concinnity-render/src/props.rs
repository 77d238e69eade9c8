//! Initial data resolution.

use async_trait::async_trait;
use serde::Serialize;

use concinnity_core::{BoxError, RenderRequest};

use crate::render_fn::RenderFn;

/// Async data resolution for the app or page phase.
#[async_trait]
pub trait InitialPropsHook: Send + Sync {
    /// Resolve initial props for a request.
    async fn initial_props(&self, request: &RenderRequest) -> Result<serde_json::Value, BoxError>;
}

/// Hook returning a fixed value.
#[derive(Debug, Clone, Default)]
pub struct StaticProps(pub serde_json::Value);

#[async_trait]
impl InitialPropsHook for StaticProps {
    async fn initial_props(&self, _request: &RenderRequest) -> Result<serde_json::Value, BoxError> {
        Ok(self.0.clone())
    }
}

/// Props resolved before rendering. Serialized into the document for
/// hydration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InitialProps {
    /// App-level props (`null` on the error path).
    pub app: serde_json::Value,
    /// Page-level props. On the error path, the error being rendered.
    pub page: serde_json::Value,
}

impl InitialProps {
    /// Whether neither phase produced any data.
    pub fn is_empty(&self) -> bool {
        self.app.is_null() && self.page.is_null()
    }
}

/// Everything the orchestrator needs to render one page.
#[derive(Clone, Copy)]
pub struct PageEntry<'a> {
    /// App data hook.
    pub app_props: Option<&'a dyn InitialPropsHook>,
    /// Page data hook.
    pub page_props: Option<&'a dyn InitialPropsHook>,
    /// Component tree entry point.
    pub render: &'a (dyn RenderFn + Sync),
}

impl<'a> PageEntry<'a> {
    /// Entry with no data hooks.
    pub fn new(render: &'a (dyn RenderFn + Sync)) -> Self {
        Self {
            app_props: None,
            page_props: None,
            render,
        }
    }

    /// Set the app data hook.
    pub fn with_app_props(mut self, hook: &'a dyn InitialPropsHook) -> Self {
        self.app_props = Some(hook);
        self
    }

    /// Set the page data hook.
    pub fn with_page_props(mut self, hook: &'a dyn InitialPropsHook) -> Self {
        self.page_props = Some(hook);
        self
    }
}

impl std::fmt::Debug for PageEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageEntry")
            .field("app_props", &self.app_props.is_some())
            .field("page_props", &self.page_props.is_some())
            .finish_non_exhaustive()
    }
}
