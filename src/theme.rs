//! Color palette for rendered overlays
//!
//! Tokens are emitted as CSS custom properties so a host page can restyle
//! an overlay without touching the markup.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when parsing a theme
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to parse theme TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A palette mapping color tokens to CSS color values
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TomlTheme")]
pub struct Theme {
    /// Optional name for the theme
    pub name: Option<String>,
    /// Color mappings: token name -> CSS color
    pub colors: BTreeMap<String, String>,
}

/// TOML structure for deserializing themes
#[derive(Deserialize)]
struct TomlTheme {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

impl From<TomlTheme> for Theme {
    fn from(parsed: TomlTheme) -> Self {
        Theme {
            name: parsed.metadata.and_then(|m| m.name),
            colors: parsed.colors,
        }
    }
}

/// Default palette: white labels on a translucent black chip
const DEFAULT_PALETTE: &str = r##"
[colors]
text-light = "#ffffff"
text-muted = "#696969"
tag-background = "rgba(0, 0, 0, 0.7)"
input-background = "#ffffff"
input-border = "#cccccc"
input-error = "#f44336"
"##;

impl Theme {
    /// Load a theme from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;
        Ok(parsed.into())
    }

    /// Resolve a token defined in this theme
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Every default token, overridden by this theme's values
    pub fn merged_with_defaults(&self) -> BTreeMap<String, String> {
        let mut colors = Self::default().colors;
        colors.extend(self.colors.clone());
        colors
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
    }
}
