//! Document shell.

use std::fmt;
use std::sync::Arc;

use concinnity_core::DocumentConfig;

use crate::head::HeadContent;
use crate::theme::{ThemeError, ThemeMode, ThemeResolver};

/// Static document markup shared by every page.
///
/// Built once per process, with the theme resolver passed in.
#[derive(Clone)]
pub struct DocumentShell {
    lang: String,
    dir: String,
    favicon: String,
    font_stylesheet: Option<String>,
    mount_id: String,
    scripts: Vec<String>,
    theme: Arc<dyn ThemeResolver>,
}

impl DocumentShell {
    /// Create a shell from configuration.
    pub fn new(config: &DocumentConfig, theme: Arc<dyn ThemeResolver>) -> Self {
        Self {
            lang: config.lang.clone(),
            dir: config.dir.clone(),
            favicon: config.favicon.clone(),
            font_stylesheet: config.font_stylesheet.clone(),
            mount_id: config.mount_id.clone(),
            scripts: config.scripts.clone(),
            theme,
        }
    }

    /// Head elements every page starts with.
    ///
    /// Queries the theme for the `theme-color` value; its errors are
    /// returned as-is.
    pub fn head(&self) -> Result<HeadContent, ThemeError> {
        let theme_color = self.theme.primary_color(ThemeMode::Light)?;

        let head = HeadContent::new()
            .with_icon(&self.favicon)
            .with_charset("utf-8")
            .with_meta("theme-color", &theme_color)
            .with_property("og:type", "website")
            .with_property("og:image", &self.favicon);

        Ok(match &self.font_stylesheet {
            Some(href) => head.with_stylesheet(href),
            None => head,
        })
    }

    /// `lang` attribute of the root element.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// `dir` attribute of the root element.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// ID of the element page markup mounts into.
    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    /// Hydration script URLs.
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }
}

impl fmt::Debug for DocumentShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentShell")
            .field("lang", &self.lang)
            .field("dir", &self.dir)
            .field("favicon", &self.favicon)
            .field("font_stylesheet", &self.font_stylesheet)
            .field("mount_id", &self.mount_id)
            .field("scripts", &self.scripts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::head::HeadElement;
    use crate::theme::StaticTheme;

    struct BrokenTheme;

    impl ThemeResolver for BrokenTheme {
        fn primary_color(&self, _mode: ThemeMode) -> Result<String, ThemeError> {
            Err(ThemeError::Unavailable("no palette".to_string()))
        }
    }

    #[test]
    fn test_head_contents_and_order() {
        let shell = DocumentShell::new(&DocumentConfig::default(), Arc::new(StaticTheme::default()));
        let head = shell.head().unwrap();
        let elements = head.elements();

        assert_eq!(elements.len(), 6);
        assert_eq!(
            elements[0],
            HeadElement::Link {
                rel: "icon".to_string(),
                href: "/favicon.png".to_string()
            }
        );
        assert_eq!(elements[1], HeadElement::Charset("utf-8".to_string()));
        assert_eq!(
            elements[2],
            HeadElement::Meta {
                name: "theme-color".to_string(),
                content: "#1976d2".to_string()
            }
        );
        assert_eq!(
            elements[4],
            HeadElement::Property {
                property: "og:image".to_string(),
                content: "/favicon.png".to_string()
            }
        );
        assert!(matches!(&elements[5], HeadElement::Link { rel, .. } if rel == "stylesheet"));
    }

    #[test]
    fn test_head_without_font_stylesheet() {
        let config = DocumentConfig {
            font_stylesheet: None,
            ..Default::default()
        };
        let shell = DocumentShell::new(&config, Arc::new(StaticTheme::default()));

        assert_eq!(shell.head().unwrap().elements().len(), 5);
    }

    #[test]
    fn test_head_passes_theme_error_through() {
        let shell = DocumentShell::new(&DocumentConfig::default(), Arc::new(BrokenTheme));

        assert_eq!(
            shell.head(),
            Err(ThemeError::Unavailable("no palette".to_string()))
        );
    }

    #[test]
    fn test_accessors() {
        let shell = DocumentShell::new(&DocumentConfig::default(), Arc::new(StaticTheme::default()));

        assert_eq!(shell.lang(), "en");
        assert_eq!(shell.dir(), "ltr");
        assert_eq!(shell.mount_id(), "app");
        assert!(shell.scripts().is_empty());
    }
}
