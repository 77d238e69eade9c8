//! Theme resolution.

use concinnity_core::ThemeConfig;

/// Colour scheme a theme is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Theme collaborator errors. Passed through to the host unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    #[error("theme unavailable: {0}")]
    Unavailable(String),

    #[error("palette has no primary colour for {0:?} mode")]
    MissingPrimary(ThemeMode),
}

/// Resolves theme values for the document shell.
///
/// Lives as long as the host process, not a request. Implementations are
/// handed to the shell at construction.
pub trait ThemeResolver: Send + Sync {
    /// Primary palette colour, used for the `theme-color` meta tag.
    fn primary_color(&self, mode: ThemeMode) -> Result<String, ThemeError>;
}

/// Theme with a fixed palette.
#[derive(Debug, Clone)]
pub struct StaticTheme {
    primary: String,
    primary_dark: String,
}

impl StaticTheme {
    /// Create a theme from explicit colours.
    pub fn new(primary: impl Into<String>, primary_dark: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            primary_dark: primary_dark.into(),
        }
    }

    /// Create a theme from configuration.
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self::new(&config.primary, &config.primary_dark)
    }
}

impl Default for StaticTheme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

impl ThemeResolver for StaticTheme {
    fn primary_color(&self, mode: ThemeMode) -> Result<String, ThemeError> {
        let color = match mode {
            ThemeMode::Light => &self.primary,
            ThemeMode::Dark => &self.primary_dark,
        };

        if color.trim().is_empty() {
            return Err(ThemeError::MissingPrimary(mode));
        }
        Ok(color.clone())
    }
}
