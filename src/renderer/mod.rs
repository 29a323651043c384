//! HTML renderer for overlay views
//!
//! This module takes an OverlayView and produces HTML markup with
//! prefixed CSS classes and inline anchored placements.

pub mod config;
pub mod html;

pub use config::HtmlConfig;
pub use html::{render_html, render_html_with_theme};
