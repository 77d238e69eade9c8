//! Request handling independent of the Spin runtime.

use std::sync::Arc;

use anyhow::Context;
use concinnity_sdk::prelude::*;
use http::Method;

use crate::auth::LoginStatus;
use crate::pages::{self, Route};

/// Service name carried by every log line.
pub const SERVICE_NAME: &str = "concinnity-frontend";

const EMBEDDED_CONFIG: &str = include_str!("../concinnity.toml");

/// What the transport should send.
#[derive(Debug)]
pub enum ResponseBody {
    /// No body.
    Empty,
    /// Redirect; the body is empty and `location` goes in the header.
    Redirect { location: String },
    /// A rendered page.
    Document(AssembledDocument),
}

/// A response ready for the transport.
#[derive(Debug)]
pub struct FrontendResponse {
    pub status: u16,
    pub body: ResponseBody,
    /// Render metrics, when a page was rendered.
    pub metrics: Option<RenderMetrics>,
}

impl FrontendResponse {
    fn page(status: u16, document: AssembledDocument, metrics: RenderMetrics) -> Self {
        Self {
            status,
            body: ResponseBody::Document(document),
            metrics: Some(metrics),
        }
    }

    fn redirect(location: &str) -> Self {
        Self {
            status: 307,
            body: ResponseBody::Redirect {
                location: location.to_string(),
            },
            metrics: None,
        }
    }

    fn method_not_allowed() -> Self {
        Self {
            status: 405,
            body: ResponseBody::Empty,
            metrics: None,
        }
    }

    /// The rendered document, if any.
    pub fn document(&self) -> Option<&AssembledDocument> {
        match &self.body {
            ResponseBody::Document(document) => Some(document),
            _ => None,
        }
    }

    /// Redirect target, if any.
    pub fn location(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Redirect { location } => Some(location),
            _ => None,
        }
    }

    /// Response headers.
    ///
    /// Pages depend on the login cookie, so they are never cached publicly.
    pub fn headers(&self, request_id: &RequestId) -> Vec<(String, String)> {
        let mut headers = vec![("x-request-id".to_string(), request_id.to_string())];

        match &self.body {
            ResponseBody::Document(_) => {
                headers.push((
                    "content-type".to_string(),
                    "text/html; charset=utf-8".to_string(),
                ));
                headers.push(("cache-control".to_string(), "private, no-cache".to_string()));
                headers.push(("vary".to_string(), "Cookie".to_string()));
            }
            ResponseBody::Redirect { location } => {
                headers.push(("location".to_string(), location.clone()));
                headers.push(("cache-control".to_string(), "no-store".to_string()));
            }
            ResponseBody::Empty if self.status == 405 => {
                headers.push(("allow".to_string(), "GET, HEAD".to_string()));
            }
            ResponseBody::Empty => {}
        }

        headers
    }
}

/// Routes requests, applies the login redirect and falls back to the error
/// page. One host serves every request of a component instance.
pub struct FrontendHost {
    orchestrator: RenderPhaseOrchestrator,
    routes: Vec<Route>,
    log_format: LogFormat,
}

impl FrontendHost {
    /// Create a host from configuration.
    pub fn new(config: &ShellConfig) -> anyhow::Result<Self> {
        let theme = Arc::new(StaticTheme::from_config(&config.theme));
        let shell = DocumentShell::new(&config.document, theme);
        let orchestrator =
            RenderPhaseOrchestrator::new(&config.styles, DocumentAssembler::new(shell))?;

        Ok(Self {
            orchestrator,
            routes: pages::routes(),
            log_format: LogFormat::Json,
        })
    }

    /// Create a host from the configuration compiled into the component.
    pub fn from_embedded_config() -> anyhow::Result<Self> {
        let config = ShellConfig::from_toml_str(EMBEDDED_CONFIG)
            .context("embedded concinnity.toml is invalid")?;
        Self::new(&config)
    }

    /// Serve an additional route.
    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Set the log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Answer one request.
    ///
    /// Unknown paths render the error page with 404. A failing page renders
    /// it with 500. Only a failure of the error page itself is returned as
    /// an error.
    pub async fn respond(&self, request: RenderRequest) -> anyhow::Result<FrontendResponse> {
        let logger = StructuredLogger::for_request(&request)
            .with_service(SERVICE_NAME)
            .with_format(self.log_format);

        if request.method != Method::GET && request.method != Method::HEAD {
            logger
                .warn_builder("method not allowed")
                .field("method", request.method.as_str())
                .status(405)
                .emit();
            return Ok(FrontendResponse::method_not_allowed());
        }

        let route = match self.routes.iter().find(|route| route.matches(&request.path)) {
            Some(route) => route,
            None => {
                return self
                    .render_error(request, ErrorRender::not_found(), &logger)
                    .await
            }
        };

        if let Some(location) = route.redirect_for(LoginStatus::from_request(&request)) {
            logger
                .info_builder("redirecting logged-in visitor")
                .field("location", location)
                .status(307)
                .emit();
            return Ok(FrontendResponse::redirect(location));
        }

        let metrics = MetricsCollector::new(request.request_id.clone()).with_route(&request.path);
        let rendered = self
            .orchestrator
            .resolve_observed(&request, &route.page, &metrics)
            .await;
        match rendered {
            Ok(document) => Ok(self.finish(200, document, metrics, &logger)),
            Err(error) => {
                logger
                    .error_builder("page render failed")
                    .phase(error.phase())
                    .field("error", error.to_string())
                    .emit();
                self.render_error(request, ErrorRender::internal(), &logger)
                    .await
            }
        }
    }

    async fn render_error(
        &self,
        request: RenderRequest,
        error: ErrorRender,
        logger: &StructuredLogger,
    ) -> anyhow::Result<FrontendResponse> {
        let status = error.status_code;
        let request = request.into_error_render(error);
        let metrics = MetricsCollector::new(request.request_id.clone()).with_route(&request.path);

        let document = self
            .orchestrator
            .resolve_observed(&request, &pages::error::entry(), &metrics)
            .await
            .with_context(|| format!("error page for {} failed to render", request.path))?;

        Ok(self.finish(status, document, metrics, logger))
    }

    fn finish(
        &self,
        status: u16,
        document: AssembledDocument,
        metrics: MetricsCollector,
        logger: &StructuredLogger,
    ) -> FrontendResponse {
        let metrics = metrics.finalize(Some(status));

        logger
            .info_builder("page rendered")
            .status(status)
            .field_u64("rules_registered", metrics.rules_registered as u64)
            .field_u64("rules_emitted", metrics.rules_emitted as u64)
            .field_u64("fragments", metrics.fragments as u64)
            .field_u64("duration_us", metrics.total_duration_us)
            .emit();
        for key in &metrics.style_conflicts {
            logger
                .warn_builder("style rule recorded with conflicting text")
                .field("key", key.as_str())
                .emit();
        }
        logger.debug(&metrics.to_summary());

        FrontendResponse::page(status, document, metrics)
    }
}
