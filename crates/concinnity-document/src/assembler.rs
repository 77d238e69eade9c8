//! Document assembly.

use concinnity_styles::CriticalStyleFragment;

use crate::document::{AssembledDocument, DocumentProps, ScriptTag, StyleTag, PROPS_SCRIPT_ID};
use crate::shell::DocumentShell;
use crate::theme::ThemeError;

/// Merges extracted style fragments into the outgoing document.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    shell: DocumentShell,
}

impl DocumentAssembler {
    /// Create an assembler around a document shell.
    pub fn new(shell: DocumentShell) -> Self {
        Self { shell }
    }

    /// The shell this assembler renders into.
    pub fn shell(&self) -> &DocumentShell {
        &self.shell
    }

    /// Assemble the final document.
    ///
    /// Fragment style tags are appended to `base.styles` in fragment order;
    /// existing styles stay first. All styles land in the head, ahead of
    /// every script. The only error is the theme collaborator's, passed
    /// through unchanged.
    pub fn assemble(
        &self,
        base: DocumentProps,
        fragments: &[CriticalStyleFragment],
    ) -> Result<AssembledDocument, ThemeError> {
        let mut head = self.shell.head()?;
        head.extend(base.head);

        let mut styles = base.styles;
        styles.extend(fragments.iter().map(StyleTag::from_fragment));

        let mut scripts = Vec::with_capacity(self.shell.scripts().len() + 1);
        if !base.data.is_null() {
            scripts.push(ScriptTag::Data {
                id: PROPS_SCRIPT_ID.to_string(),
                json: base.data.to_string(),
            });
        }
        scripts.extend(
            self.shell
                .scripts()
                .iter()
                .map(|src| ScriptTag::External { src: src.clone() }),
        );

        Ok(AssembledDocument {
            lang: self.shell.lang().to_string(),
            dir: self.shell.dir().to_string(),
            head,
            styles,
            mount_id: self.shell.mount_id().to_string(),
            body: base.html,
            scripts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use concinnity_core::DocumentConfig;
    use concinnity_styles::{CacheId, CriticalCssExtractor, StyleCollectionCache};

    use crate::head::HeadElement;
    use crate::theme::{StaticTheme, ThemeMode, ThemeResolver};

    struct BrokenTheme;

    impl ThemeResolver for BrokenTheme {
        fn primary_color(&self, _mode: ThemeMode) -> Result<String, ThemeError> {
            Err(ThemeError::Unavailable("offline".to_string()))
        }
    }

    fn assembler() -> DocumentAssembler {
        let config = DocumentConfig {
            scripts: vec!["/_app/main.js".to_string()],
            ..Default::default()
        };
        DocumentAssembler::new(DocumentShell::new(&config, Arc::new(StaticTheme::default())))
    }

    fn fragments(rules: &[(&str, &str)], markup: &str) -> Vec<CriticalStyleFragment> {
        let mut cache = StyleCollectionCache::create(CacheId::new("css").unwrap());
        for (key, text) in rules {
            cache.record(key, *text).unwrap();
        }
        CriticalCssExtractor::new().extract(markup, &cache.into_snapshot())
    }

    #[test]
    fn test_assemble_scenario() {
        let markup = r#"<div class="x">hi</div>"#;
        let base = DocumentProps {
            html: markup.to_string(),
            ..Default::default()
        };

        let doc = assembler()
            .assemble(base, &fragments(&[(".x", "color:red")], markup))
            .unwrap();

        assert_eq!(doc.style_markers().len(), 1);
        assert!(doc.style_markers()[0].ends_with(" x"));
        assert!(doc.body.contains(r#"<div class="x">"#));
    }

    #[test]
    fn test_assemble_appends_to_existing_styles() {
        let markup = r#"<p class="a b"></p>"#;
        let base = DocumentProps {
            html: markup.to_string(),
            styles: vec![StyleTag::inline("html{box-sizing:border-box}")],
            ..Default::default()
        };

        let doc = assembler()
            .assemble(base, &fragments(&[("a", ".a{}"), ("b", ".b{}")], markup))
            .unwrap();

        assert_eq!(doc.styles.len(), 2);
        assert_eq!(doc.styles[0], StyleTag::inline("html{box-sizing:border-box}"));
        assert_eq!(doc.styles[1].marker.as_deref(), Some("css a b"));
    }

    #[test]
    fn test_assemble_preserves_fragment_order() {
        let markup = r#"<p class="a c"></p>"#;
        let fragments = fragments(&[("a", ".a{}"), ("b", ".b{}"), ("c", ".c{}")], markup);

        let doc = assembler()
            .assemble(DocumentProps::default(), &fragments)
            .unwrap();

        assert_eq!(doc.style_markers(), vec!["css a", "css c"]);
    }

    #[test]
    fn test_assemble_without_fragments() {
        let doc = assembler()
            .assemble(DocumentProps::default(), &[])
            .unwrap();

        assert!(doc.styles.is_empty());
        assert!(doc.style_markers().is_empty());
    }

    #[test]
    fn test_assemble_head_order() {
        let base = DocumentProps {
            head: vec![HeadElement::Title("Concinnity".to_string())],
            ..Default::default()
        };

        let doc = assembler().assemble(base, &[]).unwrap();
        let elements = doc.head.elements();

        assert_eq!(elements.first(), Some(&HeadElement::Link {
            rel: "icon".to_string(),
            href: "/favicon.png".to_string(),
        }));
        assert_eq!(elements.last(), Some(&HeadElement::Title("Concinnity".to_string())));
    }

    #[test]
    fn test_assemble_scripts() {
        let base = DocumentProps {
            data: serde_json::json!({ "page": { "title": "Concinnity" } }),
            ..Default::default()
        };

        let doc = assembler().assemble(base, &[]).unwrap();

        assert_eq!(doc.scripts.len(), 2);
        assert!(matches!(&doc.scripts[0], ScriptTag::Data { id, .. } if id == PROPS_SCRIPT_ID));
        assert_eq!(
            doc.scripts[1],
            ScriptTag::External {
                src: "/_app/main.js".to_string()
            }
        );
    }

    #[test]
    fn test_assemble_skips_null_data() {
        let doc = assembler().assemble(DocumentProps::default(), &[]).unwrap();
        assert_eq!(doc.scripts.len(), 1);
    }

    #[test]
    fn test_assemble_passes_theme_error_through() {
        let assembler = DocumentAssembler::new(DocumentShell::new(
            &DocumentConfig::default(),
            Arc::new(BrokenTheme),
        ));

        let result = assembler.assemble(DocumentProps::default(), &[]);

        assert_eq!(
            result.err(),
            Some(ThemeError::Unavailable("offline".to_string()))
        );
    }
}
