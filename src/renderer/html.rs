//! HTML generation from overlay views

use crate::overlay::{EditorView, OverlayView, TagView};
use crate::theme::Theme;

use super::HtmlConfig;

const REMOVE_GLYPH: &str = "\u{00d7}";

/// Build overlay markup incrementally
pub struct HtmlBuilder {
    config: HtmlConfig,
    styles: Vec<String>,
    tags: Vec<String>,
    editor: Option<String>,
    write_outstanding: bool,
}

impl HtmlBuilder {
    /// Create a new HTML builder
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            config,
            styles: vec![],
            tags: vec![],
            editor: None,
            write_outstanding: false,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    /// Add CSS custom properties from a theme, plus the base rules
    pub fn add_theme(&mut self, theme: &Theme) {
        let mut css = String::from(":root {");
        for (token, value) in theme.merged_with_defaults() {
            css.push_str(&format!(" --{}: {};", token, value));
        }
        css.push_str(" }");
        self.styles.push(css);

        let p = self.prefix();
        self.styles.extend([
            format!(
                ".{p}overlay, .{p}surface {{ position: absolute; left: 0; top: 0; width: 100%; height: 100%; }}"
            ),
            format!(
                ".{p}tag {{ position: absolute; padding: 5px 10px; border-radius: 3px; background-color: var(--tag-background); color: var(--text-light); }}"
            ),
            format!(".{p}tag.{p}transient {{ color: var(--text-muted); }}"),
            format!(
                ".{p}remove {{ cursor: pointer; margin-left: 10px; color: var(--text-light); }}"
            ),
            format!(".{p}remove.{p}muted {{ color: var(--text-muted); }}"),
            format!(".{p}editor {{ position: absolute; }}"),
            format!(
                ".{p}input {{ padding: 5px 10px; border: solid 1px var(--input-border); border-radius: 3px; background: var(--input-background); }}"
            ),
            format!(".{p}input[aria-invalid=\"true\"] {{ border-color: var(--input-error); }}"),
        ]);
    }

    /// Mark that an add request is outstanding
    pub fn set_write_outstanding(&mut self, outstanding: bool) {
        self.write_outstanding = outstanding;
    }

    /// Add a confirmed or transient tag with its remove affordance
    pub fn add_tag(&mut self, tag: &TagView<'_>) {
        let markup = tag_markup(tag, &self.prefix());
        self.tags.push(markup);
    }

    /// Set the editor input
    pub fn set_editor(&mut self, editor: &EditorView<'_>) {
        let p = self.prefix();
        let mut attrs = format!(
            r#"type="text" class="{p}input" placeholder="{}" value="{}" style="width: {}px; height: {}px;""#,
            escape_html(&self.config.placeholder),
            escape_html(editor.value),
            self.config.editor_width,
            self.config.editor_height
        );
        if let Some(error) = editor.error {
            attrs.push_str(&format!(
                r#" aria-invalid="true" title="{}""#,
                escape_html(&error.to_string())
            ));
        }
        if editor.autofocus {
            attrs.push_str(" autofocus");
        }

        self.editor = Some(format!(
            r#"<div class="{p}editor" style="{}"><input {}></div>"#,
            editor.placement.to_css(),
            attrs
        ));
    }

    /// Build the final HTML string
    pub fn build(self) -> String {
        let p = self.prefix();
        let pretty = self.config.pretty_print;
        let mut html = String::new();
        let mut line = |depth: usize, content: &str| {
            if pretty {
                html.push_str(&"  ".repeat(depth));
            }
            html.push_str(content);
            if pretty {
                html.push('\n');
            }
        };

        let outstanding = if self.write_outstanding {
            r#" data-write-outstanding="true""#
        } else {
            ""
        };
        line(0, format!(r#"<div class="{p}overlay"{outstanding}>"#).as_str());

        if !self.styles.is_empty() {
            line(1, "<style>");
            for style in &self.styles {
                line(2, style.as_str());
            }
            line(1, "</style>");
        }

        line(1, format!(r#"<div class="{p}surface">"#).as_str());
        for tag in &self.tags {
            line(2, tag.as_str());
        }
        line(1, "</div>");

        if let Some(editor) = &self.editor {
            line(1, editor.as_str());
        }

        line(0, "</div>");
        html
    }
}

fn tag_markup(tag: &TagView<'_>, p: &str) -> String {
    let tag_class = if tag.transient {
        format!("{p}tag {p}transient")
    } else {
        format!("{p}tag")
    };
    let remove_class = if tag.remove_muted {
        format!("{p}remove {p}muted")
    } else {
        format!("{p}remove")
    };
    let id = escape_html(tag.id);

    format!(
        r#"<div class="{tag_class}" data-tag-id="{id}" data-transient="{}" style="{}">{id}<span class="{remove_class}" data-remove-tag="{id}">{REMOVE_GLYPH}</span></div>"#,
        tag.transient,
        tag.placement.to_css()
    )
}

/// Render an overlay view to HTML (with the default theme)
pub fn render_html(view: &OverlayView<'_>, config: &HtmlConfig) -> String {
    render_html_with_theme(view, config, &Theme::default())
}

/// Render an overlay view to HTML with a custom theme
pub fn render_html_with_theme(
    view: &OverlayView<'_>,
    config: &HtmlConfig,
    theme: &Theme,
) -> String {
    let mut builder = HtmlBuilder::new(config.clone());

    if config.include_styles {
        builder.add_theme(theme);
    }
    builder.set_write_outstanding(view.write_outstanding);

    for tag in &view.tags {
        builder.add_tag(tag);
    }
    if let Some(editor) = &view.editor {
        builder.set_editor(editor);
    }

    builder.build()
}

/// Escape special HTML characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
