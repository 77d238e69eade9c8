//! Request-scoped style collection and critical CSS extraction.
//!
//! This crate provides:
//! - `StyleCollectionCache` - Per-render registry of emitted style rules
//! - `RuleKey` / `CacheId` - Validated rule and cache identifiers
//! - `ClassReferences` - Class tokens referenced by rendered markup
//! - `CriticalCssExtractor` - Reduces a cache to the rules markup uses
//!
//! # Example
//!
//! ```ignore
//! use concinnity_styles::{CacheId, CriticalCssExtractor, StyleCollectionCache};
//!
//! let mut cache = StyleCollectionCache::create(CacheId::new("css")?);
//! let class = cache.css("color:red");
//! let markup = format!(r#"<div class="{}">hi</div>"#, class);
//!
//! let fragments = CriticalCssExtractor::new().extract(&markup, &cache.snapshot());
//! assert_eq!(fragments.len(), 1);
//! ```

mod cache;
mod extract;
mod key;
mod markup;

pub use cache::*;
pub use extract::*;
pub use key::*;
pub use markup::*;
