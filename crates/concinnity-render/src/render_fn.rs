//! Page render functions and style cache injection.

use std::cell::RefCell;

use concinnity_core::{BoxError, RenderRequest};
use concinnity_document::{HeadElement, StyleTag};
use concinnity_styles::{Recorded, StyleCollectionCache, StyleError};

use crate::props::InitialProps;

/// A component tree entry point: renders a page to markup.
///
/// Implemented for any `Fn(&mut RenderContext<'_>) -> Result<String, BoxError>`.
pub trait RenderFn {
    /// Render the tree.
    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, BoxError>;
}

impl<F> RenderFn for F
where
    F: Fn(&mut RenderContext<'_>) -> Result<String, BoxError>,
{
    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, BoxError> {
        self(ctx)
    }
}

/// What a render function can see and do.
///
/// Style rules only reach a cache when the tree runs inside
/// [`WithStyleCache`]; otherwise [`RenderContext::css`] fails with
/// [`StyleError::Detached`].
pub struct RenderContext<'a> {
    request: &'a RenderRequest,
    props: &'a InitialProps,
    cache: Option<&'a mut StyleCollectionCache>,
    head: Vec<HeadElement>,
    styles: Vec<StyleTag>,
}

impl<'a> RenderContext<'a> {
    /// Create a context with no cache attached.
    pub fn new(request: &'a RenderRequest, props: &'a InitialProps) -> Self {
        Self {
            request,
            props,
            cache: None,
            head: Vec::new(),
            styles: Vec::new(),
        }
    }

    /// The request being rendered.
    pub fn request(&self) -> &RenderRequest {
        self.request
    }

    /// Resolved initial props.
    pub fn props(&self) -> &InitialProps {
        self.props
    }

    /// Register declarations and return the class name to reference them.
    pub fn css(&mut self, declarations: &str) -> Result<String, StyleError> {
        match self.cache.as_deref_mut() {
            Some(cache) => Ok(cache.css(declarations)),
            None => Err(StyleError::Detached),
        }
    }

    /// Record a rule under an explicit key.
    pub fn record(&mut self, key: &str, text: impl Into<String>) -> Result<Recorded, StyleError> {
        match self.cache.as_deref_mut() {
            Some(cache) => cache.record(key, text),
            None => Err(StyleError::Detached),
        }
    }

    /// Whether a style cache is attached.
    pub fn has_style_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Add a head element (title, description...).
    pub fn push_head(&mut self, element: HeadElement) {
        self.head.push(element);
    }

    /// Add a style that does not go through the cache. Emitted before
    /// extracted styles.
    pub fn push_style(&mut self, style: StyleTag) {
        self.styles.push(style);
    }

    /// Head elements pushed so far.
    pub fn head(&self) -> &[HeadElement] {
        &self.head
    }

    /// Run `f` with `cache` attached, keeping everything else.
    fn with_cache<T>(
        &mut self,
        cache: &mut StyleCollectionCache,
        f: impl FnOnce(&mut RenderContext<'_>) -> T,
    ) -> T {
        let mut scoped = RenderContext {
            request: self.request,
            props: self.props,
            cache: Some(cache),
            head: std::mem::take(&mut self.head),
            styles: std::mem::take(&mut self.styles),
        };

        let out = f(&mut scoped);

        self.head = scoped.head;
        self.styles = scoped.styles;
        out
    }

    fn into_parts(self) -> (Vec<HeadElement>, Vec<StyleTag>) {
        (self.head, self.styles)
    }
}

/// Decorates a render function so every subtree it renders records into
/// one style cache.
///
/// Props, request and output of the wrapped function are untouched.
pub struct WithStyleCache<'r, R: ?Sized> {
    inner: &'r R,
    cache: RefCell<StyleCollectionCache>,
}

impl<'r, R: RenderFn + ?Sized> WithStyleCache<'r, R> {
    /// Wrap `inner` around `cache`.
    pub fn new(inner: &'r R, cache: StyleCollectionCache) -> Self {
        Self {
            inner,
            cache: RefCell::new(cache),
        }
    }

    /// Give the cache back after rendering.
    pub fn into_cache(self) -> StyleCollectionCache {
        self.cache.into_inner()
    }
}

impl<R: RenderFn + ?Sized> RenderFn for WithStyleCache<'_, R> {
    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<String, BoxError> {
        let mut cache = self.cache.try_borrow_mut()?;
        ctx.with_cache(&mut cache, |ctx| self.inner.render(ctx))
    }
}

/// Output of one cache-injected render.
pub(crate) struct Rendered {
    pub html: String,
    pub head: Vec<HeadElement>,
    pub styles: Vec<StyleTag>,
    pub cache: StyleCollectionCache,
}

/// Render `entry` with `cache` injected.
pub(crate) fn render_with_cache(
    entry: &(dyn RenderFn + Sync),
    request: &RenderRequest,
    props: &InitialProps,
    cache: StyleCollectionCache,
) -> Result<Rendered, BoxError> {
    let wrapped = WithStyleCache::new(entry, cache);
    let mut ctx = RenderContext::new(request, props);

    let html = wrapped.render(&mut ctx)?;
    let (head, styles) = ctx.into_parts();

    Ok(Rendered {
        html,
        head,
        styles,
        cache: wrapped.into_cache(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use concinnity_styles::CacheId;
    use http::Method;

    fn cache() -> StyleCollectionCache {
        StyleCollectionCache::create(CacheId::new("css").unwrap())
    }

    fn styled(ctx: &mut RenderContext<'_>) -> Result<String, BoxError> {
        let class = ctx.css("color:red")?;
        Ok(format!(r#"<div class="{}">{}</div>"#, class, ctx.request().path))
    }

    fn plain(ctx: &mut RenderContext<'_>) -> Result<String, BoxError> {
        ctx.push_head(HeadElement::Title("plain".to_string()));
        Ok(format!("<p>{}</p>", ctx.props().page))
    }

    // === RenderContext Tests ===

    #[test]
    fn test_css_without_cache_is_detached() {
        let request = RenderRequest::new(Method::GET, "/");
        let props = InitialProps::default();
        let mut ctx = RenderContext::new(&request, &props);

        assert!(!ctx.has_style_cache());
        assert_eq!(ctx.css("color:red"), Err(StyleError::Detached));
        assert_eq!(ctx.record("x", ".x{}"), Err(StyleError::Detached));
    }

    #[test]
    fn test_unwrapped_styled_render_fails() {
        let request = RenderRequest::new(Method::GET, "/");
        let props = InitialProps::default();
        let mut ctx = RenderContext::new(&request, &props);

        assert!(styled.render(&mut ctx).is_err());
    }

    // === WithStyleCache Tests ===

    #[test]
    fn test_wrapper_records_into_cache() {
        let request = RenderRequest::new(Method::GET, "/watch");
        let props = InitialProps::default();
        let mut ctx = RenderContext::new(&request, &props);

        let wrapped = WithStyleCache::new(&styled, cache());
        let html = wrapped.render(&mut ctx).unwrap();
        let cache = wrapped.into_cache();

        assert_eq!(cache.len(), 1);
        assert!(html.ends_with(">/watch</div>"));
        assert!(!ctx.has_style_cache());
    }

    #[test]
    fn test_wrapper_shares_cache_across_renders() {
        let request = RenderRequest::new(Method::GET, "/");
        let props = InitialProps::default();
        let mut ctx = RenderContext::new(&request, &props);

        let tree = |ctx: &mut RenderContext<'_>| -> Result<String, BoxError> {
            let a = ctx.css("color:red")?;
            let b = ctx.css("margin:0")?;
            ctx.record(".shared", ".shared{}")?;
            Ok(format!(r#"<p class="{} {} shared"></p>"#, a, b))
        };
        let wrapped = WithStyleCache::new(&tree, cache());
        let first = wrapped.render(&mut ctx).unwrap();
        let second = wrapped.render(&mut ctx).unwrap();

        assert_eq!(first, second);
        assert_eq!(wrapped.into_cache().len(), 3);
    }

    #[test]
    fn test_wrapper_does_not_alter_output() {
        let request = RenderRequest::new(Method::GET, "/");
        let props = InitialProps {
            app: serde_json::Value::Null,
            page: serde_json::json!("hello"),
        };

        let mut bare_ctx = RenderContext::new(&request, &props);
        let bare = plain.render(&mut bare_ctx).unwrap();

        let mut wrapped_ctx = RenderContext::new(&request, &props);
        let wrapped = WithStyleCache::new(&plain, cache());
        let decorated = wrapped.render(&mut wrapped_ctx).unwrap();

        assert_eq!(bare, decorated);
        assert_eq!(bare_ctx.head(), wrapped_ctx.head());
        assert!(wrapped.into_cache().is_empty());
    }

    #[test]
    fn test_render_with_cache_collects_parts() {
        let request = RenderRequest::new(Method::GET, "/");
        let props = InitialProps::default();
        let tree = |ctx: &mut RenderContext<'_>| -> Result<String, BoxError> {
            ctx.push_head(HeadElement::Title("Concinnity".to_string()));
            ctx.push_style(StyleTag::inline("body{margin:0}"));
            styled(ctx)
        };

        let rendered = render_with_cache(&tree, &request, &props, cache()).unwrap();

        assert_eq!(rendered.head, vec![HeadElement::Title("Concinnity".to_string())]);
        assert_eq!(rendered.styles, vec![StyleTag::inline("body{margin:0}")]);
        assert_eq!(rendered.cache.len(), 1);
        assert!(rendered.html.starts_with(r#"<div class="css-"#));
    }

    #[test]
    fn test_render_with_cache_propagates_failure() {
        let request = RenderRequest::new(Method::GET, "/");
        let props = InitialProps::default();
        let tree = |_ctx: &mut RenderContext<'_>| -> Result<String, BoxError> {
            Err("boom".into())
        };

        let result = render_with_cache(&tree, &request, &props, cache());
        assert_eq!(result.err().map(|e| e.to_string()), Some("boom".to_string()));
    }
}
