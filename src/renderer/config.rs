//! Configuration for HTML rendering

use serde::Deserialize;

/// Configuration options for HTML output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Prefix for CSS class names (e.g., "tag-" for "tag-overlay")
    pub class_prefix: Option<String>,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Whether to emit a `<style>` block with the theme and base rules
    pub include_styles: bool,

    /// Editor input width in pixels
    pub editor_width: f64,

    /// Editor input height in pixels
    pub editor_height: f64,

    /// Placeholder shown in the empty editor input
    pub placeholder: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            class_prefix: Some("tag-".to_string()),
            pretty_print: true,
            include_styles: true,
            editor_width: 150.0,
            editor_height: 32.0,
            placeholder: "Type username".to_string(),
        }
    }
}

impl HtmlConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set whether to emit the style block
    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// Set the editor input size
    pub fn with_editor_size(mut self, width: f64, height: f64) -> Self {
        self.editor_width = width;
        self.editor_height = height;
        self
    }

    /// Set the editor placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}
