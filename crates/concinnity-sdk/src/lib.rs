//! Public SDK for Concinnity frontend pages.
//!
//! This crate re-exports the whole render pipeline:
//!
//! ```ignore
//! use concinnity_sdk::prelude::*;
//!
//! fn page(ctx: &mut RenderContext<'_>) -> Result<String, BoxError> {
//!     ctx.push_head(HeadElement::Title("Concinnity".to_string()));
//!     let class = ctx.css("text-align:center")?;
//!     Ok(format!(r#"<h5 class="{}">Hello</h5>"#, class))
//! }
//!
//! let document = orchestrator
//!     .resolve(&request, &PageEntry::new(&page))
//!     .await?;
//! DocumentSink::new(sink).send_document(&document).await?;
//! ```

pub use async_trait::async_trait;
pub use concinnity_core;
pub use concinnity_document;
pub use concinnity_observability;
pub use concinnity_render;
pub use concinnity_styles;

/// Prelude for convenient imports.
pub mod prelude {
    pub use async_trait::async_trait;
    pub use concinnity_core::*;
    pub use concinnity_document::*;
    pub use concinnity_observability::*;
    pub use concinnity_render::*;
    pub use concinnity_styles::*;
}
