//! Document shell configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for the document shell and style pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Document markup settings.
    #[serde(default)]
    pub document: DocumentConfig,

    /// Style collection settings.
    #[serde(default)]
    pub styles: StyleConfig,

    /// Static theme palette.
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl ShellConfig {
    /// Parse and validate config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.styles.validate()?;

        if self.document.lang.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "document.lang",
                reason: "must not be empty".to_string(),
            });
        }

        if !matches!(self.document.dir.as_str(), "ltr" | "rtl" | "auto") {
            return Err(ConfigError::Invalid {
                field: "document.dir",
                reason: format!("expected ltr, rtl or auto, got {:?}", self.document.dir),
            });
        }

        if self.document.mount_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "document.mount_id",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Document markup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// `lang` attribute of the root element.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// `dir` attribute of the root element.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Favicon path, also used as the Open Graph image.
    #[serde(default = "default_favicon")]
    pub favicon: String,

    /// Web font stylesheet linked from the head.
    #[serde(default = "default_font_stylesheet")]
    pub font_stylesheet: Option<String>,

    /// ID of the element the page markup is mounted into.
    #[serde(default = "default_mount_id")]
    pub mount_id: String,

    /// Hydration scripts, emitted after all styles.
    #[serde(default)]
    pub scripts: Vec<String>,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_dir() -> String {
    "ltr".to_string()
}

fn default_favicon() -> String {
    "/favicon.png".to_string()
}

fn default_font_stylesheet() -> Option<String> {
    Some("https://fonts.googleapis.com/css?family=Roboto:300,400,500,700&display=swap".to_string())
}

fn default_mount_id() -> String {
    "app".to_string()
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            dir: default_dir(),
            favicon: default_favicon(),
            font_stylesheet: default_font_stylesheet(),
            mount_id: default_mount_id(),
            scripts: Vec::new(),
        }
    }
}

/// Style collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Cache identifier. Prefixes generated class names and heads every
    /// style tag's marker attribute.
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
}

fn default_cache_key() -> String {
    "css".to_string()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            cache_key: default_cache_key(),
        }
    }
}

impl StyleConfig {
    /// The cache key must be lowercase ASCII letters and `-`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = &self.cache_key;
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_lowercase() || c == '-')
            && !key.starts_with('-');

        if valid {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                field: "styles.cache_key",
                reason: format!("{:?} must be lowercase letters and '-'", key),
            })
        }
    }
}

/// Static theme palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Primary colour in light mode.
    #[serde(default = "default_primary")]
    pub primary: String,

    /// Primary colour in dark mode.
    #[serde(default = "default_primary_dark")]
    pub primary_dark: String,
}

fn default_primary() -> String {
    "#1976d2".to_string()
}

fn default_primary_dark() -> String {
    "#90caf9".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            primary_dark: default_primary_dark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ShellConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.styles.cache_key, "css");
        assert_eq!(config.document.lang, "en");
        assert_eq!(config.document.dir, "ltr");
        assert_eq!(config.document.favicon, "/favicon.png");
        assert!(config.document.font_stylesheet.is_some());
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = ShellConfig::from_toml_str(
            r#"
            [document]
            lang = "fr"
            scripts = ["/_app/main.js"]

            [styles]
            cache_key = "mui"
            "#,
        )
        .unwrap();

        assert_eq!(config.document.lang, "fr");
        assert_eq!(config.document.dir, "ltr");
        assert_eq!(config.document.scripts, vec!["/_app/main.js".to_string()]);
        assert_eq!(config.styles.cache_key, "mui");
        assert_eq!(config.theme.primary, "#1976d2");
    }

    #[test]
    fn test_from_toml_str_empty() {
        let config = ShellConfig::from_toml_str("").unwrap();
        assert_eq!(config.styles.cache_key, "css");
    }

    #[test]
    fn test_invalid_cache_key() {
        for key in ["", "CSS", "css key", "-css", "css1"] {
            let config = StyleConfig {
                cache_key: key.to_string(),
            };
            assert!(config.validate().is_err(), "{:?} should be rejected", key);
        }
    }

    #[test]
    fn test_invalid_dir() {
        let result = ShellConfig::from_toml_str(
            r#"
            [document]
            dir = "sideways"
            "#,
        );

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "document.dir",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let result = ShellConfig::from_toml_str("[document");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
