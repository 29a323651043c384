//! Settings file combining overlay, HTML and theme configuration
//!
//! ```toml
//! [overlay]
//! confirmation = "match_identity"
//! validate_mentions = true
//! pending_timeout_ms = 5000
//!
//! [html]
//! class_prefix = "tag-"
//! editor_width = 150
//!
//! [theme.colors]
//! text-muted = "#696969"
//! ```
//!
//! Every section is optional.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::overlay::OverlayConfig;
use crate::renderer::HtmlConfig;
use crate::theme::Theme;

/// Errors that can occur when loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid setting '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub overlay: OverlayConfig,
    pub html: HtmlConfig,
    pub theme: Theme,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("html.editor_width", self.html.editor_width),
            ("html.editor_height", self.html.editor_height),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SettingsError::Invalid {
                    field: field.to_string(),
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }
        if self.overlay.pending_timeout.is_some_and(|t| t.is_zero()) {
            return Err(SettingsError::Invalid {
                field: "overlay.pending_timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::ConfirmationPolicy;
    use std::time::Duration;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = Settings::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_all_sections() {
        let settings = Settings::from_str(
            r##"
[overlay]
confirmation = "count_change"
validate_mentions = true
pending_timeout_ms = 2000

[html]
class_prefix = "ig-"
pretty_print = false

[theme.metadata]
name = "Night"

[theme.colors]
text-light = "#eeeeee"
"##,
        )
        .unwrap();

        assert_eq!(settings.overlay.confirmation, ConfirmationPolicy::CountChange);
        assert!(settings.overlay.validate_mentions);
        assert_eq!(settings.overlay.pending_timeout, Some(Duration::from_secs(2)));
        assert_eq!(settings.html.class_prefix, Some("ig-".to_string()));
        assert!(!settings.html.pretty_print);
        assert_eq!(settings.html.placeholder, "Type username");
        assert_eq!(settings.theme.name, Some("Night".to_string()));
        assert_eq!(settings.theme.resolve("text-light"), Some("#eeeeee"));
    }

    #[test]
    fn test_invalid_editor_size() {
        let err = Settings::from_str("[html]\neditor_width = 0").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
        assert!(err.to_string().contains("html.editor_width"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Settings::from_str("[overlay]\npending_timeout_ms = 0").unwrap_err();
        assert!(err.to_string().contains("pending_timeout_ms"));
    }

    #[test]
    fn test_unknown_policy() {
        assert!(Settings::from_str("[overlay]\nconfirmation = \"psychic\"").is_err());
    }
}
